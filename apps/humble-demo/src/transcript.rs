use std::fmt;

use humble_core::{DiffingProvider, Reconciler, ViewComponent};
use humble_ui::{format_stack, log_stack, DefaultViewFactory, StackHost};

/// The stack as it stood after one action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub title: String,
    /// Total cycles run so far.
    pub cycles: usize,
    /// Changes in the script of the last cycle.
    pub changes: usize,
    pub listing: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    pub steps: Vec<Step>,
}

impl Transcript {
    pub fn record<C, D>(
        &mut self,
        title: impl Into<String>,
        reconciler: &Reconciler<C, StackHost, DefaultViewFactory, D>,
    ) where
        C: ViewComponent + 'static,
        D: DiffingProvider + 'static,
    {
        let step = Step {
            title: title.into(),
            cycles: reconciler.cycle_count(),
            changes: reconciler.last_script().len(),
            listing: reconciler.with_host(format_stack),
        };
        reconciler.with_host(|host| log_stack(&step.title, host));
        self.steps.push(step);
    }

    pub fn last(&self) -> Option<&Step> {
        self.steps.last()
    }
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for step in &self.steps {
            writeln!(
                f,
                "== {} (cycle {}, {} changes)",
                step.title, step.cycles, step.changes
            )?;
            f.write_str(&step.listing)?;
        }
        Ok(())
    }
}
