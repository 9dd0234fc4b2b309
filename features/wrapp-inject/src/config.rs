/// How dependency loops are detected while constructing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CycleCheck {
    /// Only slots pointing back at the root currently being constructed are reported.
    ///
    /// Catches self references and loops through the root. A loop which never passes
    /// the current root is not detected and recurses until the stack overflows.
    #[default]
    CurrentRoot,
    /// Every instance on the path from the root to the current instance is checked.
    Chain,
}

/// Options for a single weave
#[derive(Debug, Clone, Default)]
pub struct WeaveConfig {
    pub cycle_check: CycleCheck,
}

impl WeaveConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cycle_check(mut self, cycle_check: CycleCheck) -> Self {
        self.cycle_check = cycle_check;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_root_relative_loop_check() {
        assert_eq!(WeaveConfig::new().cycle_check, CycleCheck::CurrentRoot);
    }

    #[test]
    fn setter_overrides_cycle_check() {
        let config = WeaveConfig::new().cycle_check(CycleCheck::Chain);
        assert_eq!(config.cycle_check, CycleCheck::Chain);
    }
}
