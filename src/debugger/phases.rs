use std::{
    cell::RefCell,
    time::{Duration, Instant},
};

/// Nested wall-clock spans, in the order they were opened.
pub struct Timeline {
    spans: Vec<Span>,
    open: Option<usize>,
}

struct Span {
    label: String,
    started: Instant,
    took: Option<Duration>,
    parent: Option<usize>,
    depth: usize,
}

impl Timeline {
    pub fn new() -> Self {
        Self {
            spans: Vec::new(),
            open: None,
        }
    }

    pub fn begin(&mut self, label: impl Into<String>) {
        let depth = self.open.map_or(0, |p| self.spans[p].depth + 1);
        self.spans.push(Span {
            label: label.into(),
            started: Instant::now(),
            took: None,
            parent: self.open,
            depth,
        });
        self.open = Some(self.spans.len() - 1);
    }

    /// Closes the innermost open span. No-op when nothing is open.
    pub fn end(&mut self) {
        let Some(idx) = self.open else {
            return;
        };
        let span = &mut self.spans[idx];
        span.took = Some(span.started.elapsed());
        self.open = span.parent;
    }

    /// Duration of the most recent closed span called `label`.
    pub fn elapsed(&self, label: &str) -> Option<Duration> {
        self.spans
            .iter()
            .rev()
            .filter(|s| s.label == label)
            .find_map(|s| s.took)
    }

    pub fn report(&self) -> String {
        let width = self
            .spans
            .iter()
            .map(|s| 2 * s.depth + s.label.len())
            .max()
            .unwrap_or(0);

        let mut out = String::from("\n=== Workload Timeline ===\n");
        for span in &self.spans {
            let name = format!("{}{}", "  ".repeat(span.depth), span.label);
            let took = match span.took {
                Some(d) => format!("{:>10.3}ms", d.as_secs_f64() * 1000.0),
                None => format!("{:>12}", "(open)"),
            };
            out.push_str(&format!("{:<width$}  {}\n", name, took, width = width));
        }
        out
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}

thread_local! {
    static TIMELINE: RefCell<Timeline> = RefCell::new(Timeline::new());
}

pub fn begin_phase(label: impl Into<String>) {
    TIMELINE.with(|t| t.borrow_mut().begin(label));
}

pub fn end_phase() {
    TIMELINE.with(|t| t.borrow_mut().end());
}

/// Milliseconds spent in the last closed phase called `label`, 0 if none.
pub fn phase_millis(label: &str) -> f64 {
    TIMELINE.with(|t| {
        t.borrow()
            .elapsed(label)
            .map_or(0.0, |d| d.as_secs_f64() * 1000.0)
    })
}

pub fn get_report() -> String {
    TIMELINE.with(|t| t.borrow().report())
}

pub fn reset() {
    TIMELINE.with(|t| *t.borrow_mut() = Timeline::new());
}

/// Runs `$body` inside a named phase and yields its value.
#[macro_export]
macro_rules! db_phase {
    ($label:expr, $body:block) => {{
        $crate::debugger::phases::begin_phase($label);
        let result = $body;
        $crate::debugger::phases::end_phase();
        result
    }};
}

#[cfg(test)]
mod tests {
    use super::Timeline;

    #[test]
    fn nested_spans_are_indented() {
        let mut t = Timeline::new();
        t.begin("experiment");
        t.begin("insert");
        t.end();
        t.end();

        let report = t.report();
        assert!(report.contains("experiment"));
        assert!(report.contains("\n  insert"));
        assert!(t.elapsed("insert").is_some());
        assert!(t.elapsed("delete").is_none());
    }

    #[test]
    fn open_span_has_no_duration() {
        let mut t = Timeline::new();
        t.begin("load");
        assert!(t.elapsed("load").is_none());
        assert!(t.report().contains("(open)"));

        t.end();
        t.end();
        assert!(t.elapsed("load").is_some());
    }

    #[test]
    fn db_phase_returns_body_value() {
        super::reset();
        let n = crate::db_phase!("sum", { (1..=4).sum::<i32>() });
        assert_eq!(n, 10);
        assert!(super::phase_millis("sum") >= 0.0);
        assert!(super::get_report().contains("sum"));
    }
}
