//! Warning collection (spec.md §4.6, §6): non-fatal issues noticed while
//! building the parse tree or walking basis paths, surfaced in the head
//! of `run_engine`'s output instead of `"SUCCESS"`.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// The regex has a `^`/`$` on some but not all basis paths, or one
    /// appears mid-string on a path where it's present.
    AnchorInconsistent { detail: String },
    /// Two distinct character classes in the regex expand to the same
    /// member set.
    DuplicateCharacterSets,
}

impl Warning {
    pub fn render(&self) -> String {
        match self {
            Warning::AnchorInconsistent { detail } => format!("WARNING: {detail}"),
            Warning::DuplicateCharacterSets => {
                "WARNING: multiple character classes share the same member set".to_string()
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct WarningCollector {
    warnings: Vec<Warning>,
}

impl WarningCollector {
    pub fn new() -> Self {
        WarningCollector::default()
    }

    pub fn push(&mut self, warning: Warning) {
        if !self.warnings.contains(&warning) {
            self.warnings.push(warning);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    /// The head of `run_engine`'s output: a single element, `"SUCCESS"`
    /// if no warnings were raised, else every distinct warning rendered
    /// on its own line and joined into one newline-joined report
    /// (spec.md §4.6: "Warnings are prepended as a single head element").
    pub fn render_head(&self) -> String {
        if self.warnings.is_empty() {
            "SUCCESS".to_string()
        } else {
            self.warnings.iter().map(Warning::render).collect::<Vec<_>>().join("\n")
        }
    }
}
