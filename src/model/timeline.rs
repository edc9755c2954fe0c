use chrono::NaiveDateTime;

use super::project::ProjectBounds;
use super::task::TaskRecord;
use super::temporal::{add_months, day_fraction, months_between};
use crate::config::TimelineConfig;

/// Visible date window and its horizontal scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineWindow {
    /// The leftmost visible date. Column 0 begins at the first of its month.
    pub start: NaiveDateTime,
    /// The rightmost visible date.
    pub end: NaiveDateTime,
    /// Effective month column width after shrink-to-fit.
    pub column_width_px: f32,
    /// Whole months from `start`'s month to `end`'s month.
    pub total_months: i32,
    /// Multiplier applied to the requested column width, in `(0, 1]`.
    pub shrink_factor: f32,
    /// Unscaled width: `total_months × requested column + partial month`.
    pub full_width_px: f32,
    /// Width available for the chart once the side panel is taken off.
    pub available_width_px: f32,
    /// True when even the floored shrink factor does not fit the viewport.
    pub overflow: bool,
}

impl TimelineWindow {
    /// Derive the window from bounds hints, the task set and the viewport.
    pub fn compute(
        bounds: &ProjectBounds,
        tasks: &[TaskRecord],
        viewport_width_px: f32,
        now: NaiveDateTime,
        config: &TimelineConfig,
    ) -> Self {
        let start = bounds
            .project_start
            .or(bounds.registered_at)
            .or_else(|| tasks.iter().map(|t| t.start).min())
            .unwrap_or(now);

        let fallback_end = add_months(start, config.default_span_months);
        let end = bounds
            .project_end
            .or(bounds.target_date)
            .map(|anchor| add_months(anchor, config.extension_months))
            .filter(|end| *end >= start)
            .unwrap_or(fallback_end);

        let total_months = months_between(start, end).max(0);
        let requested = config.column_width_px;
        let partial = day_fraction(end) as f32 * requested;
        let full_width_px = total_months as f32 * requested + partial;

        let viewport = if viewport_width_px.is_finite() { viewport_width_px } else { 0.0 };
        let available_width_px = (viewport - config.side_panel_width_px).max(0.0);
        let min_shrink = config.min_shrink.clamp(f32::MIN_POSITIVE, 1.0);

        let shrink_factor = if full_width_px > available_width_px && full_width_px > 0.0 {
            (available_width_px / full_width_px).max(min_shrink).min(1.0)
        } else {
            1.0
        };
        let column_width_px = requested * shrink_factor;
        let overflow = full_width_px * shrink_factor > available_width_px + 0.5;

        tracing::debug!(
            %start,
            %end,
            total_months,
            shrink_factor,
            column_width_px,
            overflow,
            "computed timeline window"
        );

        Self {
            start,
            end,
            column_width_px,
            total_months,
            shrink_factor,
            full_width_px,
            available_width_px,
            overflow,
        }
    }

    /// Convert a date to an x-pixel offset from the window origin.
    pub fn x_for(&self, date: NaiveDateTime) -> f32 {
        let months = months_between(self.start, date) as f64 + day_fraction(date);
        (months * self.column_width_px as f64) as f32
    }

    /// Width of the laid-out range after scaling.
    pub fn content_width(&self) -> f32 {
        self.full_width_px * self.shrink_factor
    }

    /// Canvas width: the scaled range plus half a column of lookahead.
    pub fn total_width(&self) -> f32 {
        self.content_width() + self.column_width_px * 0.5
    }

    /// Number of month columns to draw, including the trailing partial month.
    pub fn column_count(&self) -> i32 {
        self.total_months + 1
    }

    pub fn contains(&self, date: NaiveDateTime) -> bool {
        date >= self.start && date <= self.end
    }

    /// Clip `[start, end]` to the window, or `None` when it lies fully outside.
    pub fn clip(&self, start: NaiveDateTime, end: NaiveDateTime) -> Option<(NaiveDateTime, NaiveDateTime)> {
        if end < self.start || start > self.end {
            return None;
        }
        Some((start.max(self.start), end.min(self.end)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::TaskKind;
    use chrono::{NaiveDate, NaiveTime};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_time(NaiveTime::MIN)
    }

    fn task(start: NaiveDateTime) -> TaskRecord {
        TaskRecord {
            id: "t".into(),
            name: "t".into(),
            start,
            end: start,
            kind: TaskKind::Task,
            progress: 0.0,
            risk_level: None,
            risk_message: None,
            dependencies: Vec::new(),
            slug: "t".into(),
        }
    }

    #[test]
    fn thirty_months_shrink_into_an_800px_viewport() {
        let bounds = ProjectBounds {
            project_start: Some(ymd(2025, 1, 1)),
            project_end: Some(ymd(2027, 7, 1)),
            ..Default::default()
        };
        let config = TimelineConfig {
            extension_months: 0,
            ..TimelineConfig::default()
        };
        let window = TimelineWindow::compute(&bounds, &[], 800.0, ymd(2025, 6, 1), &config);

        assert_eq!(window.total_months, 30);
        assert!((window.full_width_px - 2700.0).abs() < 1e-3);
        assert!((window.available_width_px - 680.0).abs() < 1e-3);
        assert!((window.shrink_factor - 680.0 / 2700.0).abs() < 1e-4);
        assert!((window.column_width_px - 22.666).abs() < 0.01);
        assert!(!window.overflow);
        assert!(window.content_width() <= window.available_width_px + 1e-3);
        assert!(window.total_width() <= window.available_width_px + window.column_width_px * 0.5 + 1e-3);
    }

    #[test]
    fn shrink_factor_is_floored() {
        let bounds = ProjectBounds {
            project_start: Some(ymd(2020, 1, 1)),
            project_end: Some(ymd(2030, 1, 1)),
            ..Default::default()
        };
        let window = TimelineWindow::compute(&bounds, &[], 400.0, ymd(2025, 1, 1), &TimelineConfig::default());
        assert_eq!(window.shrink_factor, 0.2);
        assert!(window.overflow);
        assert!(window.content_width() > window.available_width_px);
    }

    #[test]
    fn wide_viewport_keeps_requested_width() {
        let bounds = ProjectBounds {
            project_start: Some(ymd(2025, 1, 1)),
            target_date: Some(ymd(2025, 6, 1)),
            ..Default::default()
        };
        let window = TimelineWindow::compute(&bounds, &[], 2000.0, ymd(2025, 1, 1), &TimelineConfig::default());
        assert_eq!(window.shrink_factor, 1.0);
        assert_eq!(window.column_width_px, 90.0);
        // Target date is extended by one month.
        assert_eq!(window.end, ymd(2025, 7, 1));
    }

    #[test]
    fn start_falls_back_through_the_chain() {
        let config = TimelineConfig::default();
        let now = ymd(2026, 3, 3);
        let registered = ProjectBounds {
            registered_at: Some(ymd(2024, 5, 5)),
            ..Default::default()
        };
        let tasks = [task(ymd(2025, 2, 2)), task(ymd(2024, 12, 1))];

        assert_eq!(TimelineWindow::compute(&registered, &tasks, 900.0, now, &config).start, ymd(2024, 5, 5));
        assert_eq!(
            TimelineWindow::compute(&ProjectBounds::default(), &tasks, 900.0, now, &config).start,
            ymd(2024, 12, 1)
        );
        let empty = TimelineWindow::compute(&ProjectBounds::default(), &[], 900.0, now, &config);
        assert_eq!(empty.start, now);
        assert_eq!(empty.end, ymd(2028, 3, 3));
    }

    #[test]
    fn end_before_start_uses_default_span() {
        let bounds = ProjectBounds {
            project_start: Some(ymd(2025, 6, 1)),
            project_end: Some(ymd(2024, 1, 1)),
            ..Default::default()
        };
        let window = TimelineWindow::compute(&bounds, &[], 900.0, ymd(2025, 1, 1), &TimelineConfig::default());
        assert_eq!(window.end, ymd(2027, 6, 1));
    }

    #[test]
    fn zero_viewport_still_yields_positive_shrink() {
        let bounds = ProjectBounds {
            project_start: Some(ymd(2025, 1, 1)),
            ..Default::default()
        };
        let window = TimelineWindow::compute(&bounds, &[], 0.0, ymd(2025, 1, 1), &TimelineConfig::default());
        assert!(window.shrink_factor > 0.0 && window.shrink_factor <= 1.0);
    }

    #[test]
    fn x_for_interpolates_within_months() {
        let bounds = ProjectBounds {
            project_start: Some(ymd(2025, 1, 1)),
            ..Default::default()
        };
        let window = TimelineWindow::compute(&bounds, &[], 10_000.0, ymd(2025, 1, 1), &TimelineConfig::default());
        assert_eq!(window.x_for(ymd(2025, 1, 1)), 0.0);
        assert!((window.x_for(ymd(2025, 3, 1)) - 180.0).abs() < 1e-3);
        assert!((window.x_for(ymd(2025, 4, 16)) - 315.0).abs() < 1e-3);
    }

    #[test]
    fn clip_drops_ranges_outside_the_window() {
        let bounds = ProjectBounds {
            project_start: Some(ymd(2025, 1, 1)),
            project_end: Some(ymd(2025, 12, 1)),
            ..Default::default()
        };
        let window = TimelineWindow::compute(&bounds, &[], 900.0, ymd(2025, 1, 1), &TimelineConfig::default());
        assert_eq!(window.clip(ymd(2024, 1, 1), ymd(2024, 6, 1)), None);
        assert_eq!(
            window.clip(ymd(2024, 11, 1), ymd(2025, 2, 1)),
            Some((ymd(2025, 1, 1), ymd(2025, 2, 1)))
        );
    }
}
