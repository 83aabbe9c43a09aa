use super::argument::Argument;
use crate::error::{Result, YaapError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchOption {
    pub name: String,
    pub help: Option<String>,
}

/// A set of mutually exclusive options collapsing to one destination.
///
/// By default every option becomes its own flag `--<option>`; selecting one
/// stores the option name under `dest`. With [`MutexSwitch::single_arg`] a
/// single `--<dest> <option>` argument is declared instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutexSwitch {
    dest: String,
    options: Vec<SwitchOption>,
    default: Option<String>,
    single_arg: bool,
    required: bool,
}

impl MutexSwitch {
    pub fn new(dest: impl Into<String>) -> Self {
        Self {
            dest: dest.into(),
            options: Vec::new(),
            default: None,
            single_arg: false,
            required: false,
        }
    }

    /// Switch over plain option names, none of which carry help text.
    pub fn from_names<I, S>(dest: impl Into<String>, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names
            .into_iter()
            .fold(Self::new(dest), |switch, name| switch.option(name))
    }

    /// Switch over option names mapped to their help text.
    pub fn from_help<I, K, V>(dest: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        options
            .into_iter()
            .fold(Self::new(dest), |switch, (name, help)| {
                switch.option_with_help(name, help)
            })
    }

    pub fn option(self, name: impl Into<String>) -> Self {
        self.push(name.into(), None)
    }

    pub fn option_with_help(self, name: impl Into<String>, help: impl Into<String>) -> Self {
        self.push(name.into(), Some(help.into()))
    }

    fn push(mut self, name: String, help: Option<String>) -> Self {
        match self.options.iter_mut().find(|o| o.name == name) {
            Some(existing) => existing.help = help,
            None => self.options.push(SwitchOption { name, help }),
        }
        self
    }

    pub fn default_value(mut self, name: impl Into<String>) -> Self {
        self.default = Some(name.into());
        self
    }

    pub fn single_arg(mut self, single_arg: bool) -> Self {
        self.single_arg = single_arg;
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn dest(&self) -> &str {
        &self.dest
    }

    pub fn options(&self) -> &[SwitchOption] {
        &self.options
    }

    pub fn default_choice(&self) -> Option<&str> {
        self.default.as_deref()
    }

    pub fn is_single_arg(&self) -> bool {
        self.single_arg
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn has_option(&self, name: &str) -> bool {
        self.options.iter().any(|o| o.name == name)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.options.is_empty() {
            return Err(YaapError::configuration(format!(
                "switch '{}' declares no options",
                self.dest
            )));
        }
        if let Some(bad) = self
            .options
            .iter()
            .find(|o| o.name.is_empty() || o.name.starts_with('-'))
        {
            return Err(YaapError::configuration(format!(
                "invalid option name '{}' for switch '{}'",
                bad.name, self.dest
            )));
        }
        if let Some(default) = &self.default {
            if !self.has_option(default) {
                return Err(YaapError::configuration(format!(
                    "default '{}' for switch '{}' is not one of its options",
                    default, self.dest
                )));
            }
        }
        Ok(())
    }

    /// Help text of single-flag mode: every option on its own line.
    pub(crate) fn combined_help(&self) -> String {
        self.options
            .iter()
            .map(|o| format!("{}: {}", o.name, o.help.as_deref().unwrap_or_default()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// The choice-constrained argument declared in single-flag mode.
    pub(crate) fn to_argument(&self) -> Argument {
        let mut argument = Argument::option(self.dest.clone())
            .choices(self.options.iter().map(|o| o.name.clone()))
            .help(self.combined_help())
            .required(self.required);
        if let Some(default) = &self.default {
            argument = argument.default_value(default.clone());
        }
        argument
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_outside_options_is_configuration_error() {
        let switch = MutexSwitch::from_names("bar", ["x", "y"]).default_value("z");
        let result = switch.validate();
        assert!(matches!(result, Err(YaapError::Configuration(_))));
    }

    #[test]
    fn test_default_inside_options_is_accepted() {
        let switch = MutexSwitch::from_names("bar", ["x", "y"]).default_value("y");
        assert!(switch.validate().is_ok());
    }

    #[test]
    fn test_empty_switch_is_rejected() {
        assert!(MutexSwitch::new("bar").validate().is_err());
    }

    #[test]
    fn test_names_collapse_like_a_set() {
        let switch = MutexSwitch::from_names("bar", ["this", "that", "this"]);
        let names: Vec<_> = switch.options().iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["this", "that"]);
        assert!(switch.options().iter().all(|o| o.help.is_none()));
    }

    #[test]
    fn test_combined_help_concatenates_every_option() {
        let switch = MutexSwitch::from_help("mode", [("fast", "go fast"), ("slow", "go slow")])
            .option("auto");
        assert_eq!(
            switch.combined_help(),
            "fast: go fast\nslow: go slow\nauto: "
        );
    }

    #[test]
    fn test_single_arg_argument_shape() {
        let argument = MutexSwitch::from_names("mode", ["fast", "slow"])
            .default_value("fast")
            .single_arg(true)
            .to_argument();
        assert_eq!(argument.dest(), "mode");
        assert_eq!(argument.long_name(), Some("mode"));
        assert!(argument.validate().is_ok());
    }
}
