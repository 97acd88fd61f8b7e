//! Holds the accumulated plan (actions and errors) and commits it: either
//! reports every error and fails on the first, or runs every action in
//! order (optionally dry).

use crate::action::Action;
use crate::error::{DployError, ErrorList};

pub struct Executor {
    actions: Vec<Action>,
    errors: ErrorList,
    silent: bool,
    dry_run: bool,
}

impl Executor {
    pub fn new(silent: bool, dry_run: bool) -> Self {
        Self {
            actions: Vec::new(),
            errors: ErrorList::new(),
            silent,
            dry_run,
        }
    }

    pub fn add_action(&mut self, action: Action) {
        self.actions.push(action);
    }

    pub fn add_error(&mut self, error: DployError) {
        self.errors.add(error);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Reports and fails on the first collected error, if any.
    pub fn handle_errors(&self) -> Result<(), DployError> {
        self.errors.handle(self.silent)
    }

    /// Runs every action in insertion order, printing a description of
    /// each first unless silent, and invoking its effect unless this is a
    /// dry run.
    pub fn execute(self) -> Result<(), DployError> {
        for action in &self.actions {
            if !self.silent {
                println!("{}", action.describe());
            }
            if !self.dry_run {
                action.execute()?;
            }
        }
        Ok(())
    }
}
