use std::collections::HashMap;
use std::path::Path;

use serde_json::{json, Map, Value};

use crate::error::SnapshotError;

/// Records read from a CSV file, in the same raw shape a snapshot carries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsvImport {
    pub tasks: Vec<Value>,
    pub subtasks: Vec<Value>,
    /// Rows dropped because they were unreadable or had no name.
    pub skipped: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Column {
    Id,
    Name,
    Start,
    End,
    Progress,
    Parent,
    Milestone,
    Risk,
    RiskMessage,
    Dependencies,
}

/// Map a status string to a progress percentage.
fn status_to_progress(status: &str) -> Option<f32> {
    match status.trim().to_lowercase().as_str() {
        "finished" | "done" | "complete" | "completed" | "booked" | "paid" => Some(100.0),
        "in progress" | "in-progress" | "active" | "started" => Some(50.0),
        "planned" | "quoted" => Some(25.0),
        "not started" | "not-started" | "new" | "todo" => Some(0.0),
        _ => None,
    }
}

/// Detect delimiter by checking the first line for common separators.
fn detect_delimiter(first_line: &str) -> u8 {
    let semicolons = first_line.matches(';').count();
    let commas = first_line.matches(',').count();
    let tabs = first_line.matches('\t').count();

    if semicolons >= commas && semicolons >= tabs {
        b';'
    } else if tabs >= commas {
        b'\t'
    } else {
        b','
    }
}

/// Normalize a header string to a canonical column key.
fn normalize_header(h: &str) -> String {
    h.trim().to_lowercase().replace([' ', '-', '_'], "")
}

fn header_to_col(normalized: &str) -> Option<Column> {
    match normalized {
        "id" | "taskid" | "key" | "uid" => Some(Column::Id),

        "name" | "task" | "tasklabel" | "taskname" | "label" | "title" | "activity" => {
            Some(Column::Name)
        }

        "start" | "startdate" | "from" | "begin" | "begindate" | "date" | "when" => {
            Some(Column::Start)
        }

        "end" | "enddate" | "to" | "finish" | "finishdate" | "due" | "duedate" | "until" => {
            Some(Column::End)
        }

        "status" | "state" | "progress" | "stage" | "done" => Some(Column::Progress),

        "parent" | "parentid" | "parenttask" | "parentname" | "subtaskof" => Some(Column::Parent),

        "milestone" | "ismilestone" | "type" | "kind" => Some(Column::Milestone),

        "risk" | "risklevel" => Some(Column::Risk),

        "riskmessage" | "risknote" | "warning" => Some(Column::RiskMessage),

        "dependencies" | "dependson" | "predecessors" | "after" => Some(Column::Dependencies),

        _ => None,
    }
}

/// Import tasks and subtasks from a CSV file.
pub fn import_csv(path: &Path) -> Result<CsvImport, SnapshotError> {
    let content = std::fs::read_to_string(path).map_err(|source| SnapshotError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let imported = parse_csv(&content)?;
    tracing::info!(
        path = %path.display(),
        tasks = imported.tasks.len(),
        subtasks = imported.subtasks.len(),
        skipped = imported.skipped,
        "imported CSV"
    );
    Ok(imported)
}

/// Parse CSV text into raw task and subtask records.
///
/// The delimiter is auto-detected (semicolon, comma, tab) and headers are
/// matched flexibly ("Task Label", "Start Date", ...). Rows with a non-empty
/// parent column become subtasks; the parent may be given by id or by the
/// name of a task in the same file. Dates are passed through untouched.
pub fn parse_csv(content: &str) -> Result<CsvImport, SnapshotError> {
    let first_line = content.lines().next().unwrap_or("");
    let delimiter = detect_delimiter(first_line);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    let col_map: Vec<Option<Column>> = headers
        .iter()
        .map(|h| header_to_col(&normalize_header(h)))
        .collect();

    let has = |c: Column| col_map.contains(&Some(c));
    if !has(Column::Name) || !has(Column::Start) {
        return Err(SnapshotError::MissingColumns {
            found: headers.iter().map(str::to_string).collect(),
        });
    }

    let mut imported = CsvImport::default();
    // Parent references are resolved once every task row is known.
    let mut pending_subtasks: Vec<(Map<String, Value>, String)> = Vec::new();

    for (i, result) in reader.records().enumerate() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!(row = i + 2, error = %e, "skipping unreadable CSV row");
                imported.skipped += 1;
                continue;
            }
        };

        let mut cells: HashMap<Column, String> = HashMap::new();
        for (value, column) in record.iter().zip(&col_map) {
            if let Some(column) = column {
                if !value.is_empty() {
                    cells.entry(*column).or_insert_with(|| value.to_string());
                }
            }
        }

        let Some(name) = cells.remove(&Column::Name) else {
            imported.skipped += 1;
            continue;
        };

        let mut object = Map::new();
        object.insert("name".into(), Value::String(name));
        if let Some(id) = cells.remove(&Column::Id) {
            object.insert("id".into(), Value::String(id));
        }
        if let Some(start) = cells.remove(&Column::Start) {
            object.insert("start".into(), Value::String(start));
        }
        if let Some(end) = cells.remove(&Column::End) {
            object.insert("end".into(), Value::String(end));
        }
        if let Some(progress) = cells.remove(&Column::Progress) {
            let value = status_to_progress(&progress).map(|p| json!(p)).unwrap_or(Value::String(progress));
            object.insert("progress".into(), value);
        }

        match cells.remove(&Column::Parent) {
            Some(parent) => pending_subtasks.push((object, parent)),
            None => {
                if let Some(kind) = cells.remove(&Column::Milestone) {
                    object.insert("type".into(), Value::String(milestone_type(&kind)));
                }
                if let Some(risk) = cells.remove(&Column::Risk) {
                    object.insert("riskLevel".into(), Value::String(risk));
                }
                if let Some(message) = cells.remove(&Column::RiskMessage) {
                    object.insert("riskMessage".into(), Value::String(message));
                }
                if let Some(deps) = cells.remove(&Column::Dependencies) {
                    object.insert("dependencies".into(), Value::String(deps));
                }
                imported.tasks.push(Value::Object(object));
            }
        }
    }

    resolve_parents(&mut imported, pending_subtasks);

    if imported.tasks.is_empty() && imported.subtasks.is_empty() {
        return Err(SnapshotError::Empty {
            skipped: imported.skipped,
        });
    }
    Ok(imported)
}

fn milestone_type(raw: &str) -> String {
    match raw.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" | "milestone" => "milestone".to_string(),
        "false" | "no" | "0" | "" => "task".to_string(),
        other => other.to_string(),
    }
}

/// Point each pending subtask at a task id. A parent cell that names a task
/// in this file (case-insensitive) gets that task's id, minting one when the
/// row had none. Anything else is taken to be an id from elsewhere.
fn resolve_parents(imported: &mut CsvImport, pending: Vec<(Map<String, Value>, String)>) {
    if pending.is_empty() {
        return;
    }

    let mut by_name: HashMap<String, usize> = HashMap::new();
    let mut known_ids: HashMap<String, usize> = HashMap::new();
    for (index, task) in imported.tasks.iter().enumerate() {
        if let Some(name) = task.get("name").and_then(Value::as_str) {
            by_name.entry(name.to_lowercase()).or_insert(index);
        }
        if let Some(id) = task.get("id").and_then(Value::as_str) {
            known_ids.insert(id.to_string(), index);
        }
    }

    for (mut object, parent) in pending {
        let parent_id = if known_ids.contains_key(&parent) {
            parent
        } else if let Some(&index) = by_name.get(&parent.to_lowercase()) {
            task_id(&mut imported.tasks[index])
        } else {
            tracing::debug!(parent = %parent, "CSV subtask parent not found in file; keeping it as an id");
            parent
        };
        object.insert("parentId".into(), Value::String(parent_id));
        imported.subtasks.push(Value::Object(object));
    }
}

fn task_id(task: &mut Value) -> String {
    if let Some(id) = task.get("id").and_then(Value::as_str) {
        return id.to_string();
    }
    let id = format!("csv-{}", uuid::Uuid::new_v4());
    if let Value::Object(map) = task {
        map.insert("id".into(), Value::String(id.clone()));
    }
    id
}
