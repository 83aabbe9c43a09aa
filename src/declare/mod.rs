//! Declaration shorthand shared by the parser and every group it hands out.

pub mod argument;
pub(crate) mod registry;
pub mod switch;

pub use argument::{Argument, Cardinality, ValueKind};
pub use switch::{MutexSwitch, SwitchOption};

use crate::error::Result;
use registry::{Registry, Scope};

/// Argument declaration capability.
///
/// Implemented by [`ArgParser`](crate::ArgParser) and by every group it
/// produces, so groups can declare arguments, nested groups and switches the
/// same way the parser does.
pub trait ArgumentDeclarer {
    /// Declare one argument.
    fn add(&mut self, argument: Argument) -> Result<&mut Self>;

    /// Declare a titled group of arguments; the title becomes a help heading.
    fn add_group(&mut self, title: &str) -> ArgumentGroup<'_>;

    /// Declare a group whose members exclude each other. With `required`,
    /// exactly one member must be supplied.
    fn add_mutex_group(&mut self, required: bool) -> MutexGroup<'_>;

    /// Declare a set of mutually exclusive switches collapsing to one destination.
    fn add_mutex_switch(&mut self, switch: MutexSwitch) -> Result<&mut Self>;

    /// Shorthand for [`ArgumentDeclarer::add`].
    fn a(&mut self, argument: Argument) -> Result<&mut Self> {
        self.add(argument)
    }

    /// Shorthand for [`ArgumentDeclarer::add_group`].
    fn g(&mut self, title: &str) -> ArgumentGroup<'_> {
        self.add_group(title)
    }
}

/// Titled group of arguments.
#[derive(Debug)]
pub struct ArgumentGroup<'a> {
    registry: &'a mut Registry,
    scope: Scope,
}

impl<'a> ArgumentGroup<'a> {
    pub(crate) fn new(registry: &'a mut Registry, scope: Scope) -> Self {
        Self { registry, scope }
    }
}

/// Group of mutually exclusive arguments.
#[derive(Debug)]
pub struct MutexGroup<'a> {
    registry: &'a mut Registry,
    scope: Scope,
}

impl<'a> MutexGroup<'a> {
    pub(crate) fn new(registry: &'a mut Registry, scope: Scope) -> Self {
        Self { registry, scope }
    }
}

impl ArgumentDeclarer for ArgumentGroup<'_> {
    fn add(&mut self, argument: Argument) -> Result<&mut Self> {
        self.registry.declare_argument(argument, &self.scope)?;
        Ok(self)
    }

    fn add_group(&mut self, title: &str) -> ArgumentGroup<'_> {
        ArgumentGroup::new(self.registry, self.scope.with_heading(title))
    }

    fn add_mutex_group(&mut self, required: bool) -> MutexGroup<'_> {
        let scope = self.registry.open_exclusive(&self.scope, required);
        MutexGroup::new(self.registry, scope)
    }

    fn add_mutex_switch(&mut self, switch: MutexSwitch) -> Result<&mut Self> {
        self.registry.declare_switch(switch, &self.scope)?;
        Ok(self)
    }
}

impl ArgumentDeclarer for MutexGroup<'_> {
    fn add(&mut self, argument: Argument) -> Result<&mut Self> {
        self.registry.declare_argument(argument, &self.scope)?;
        Ok(self)
    }

    fn add_group(&mut self, title: &str) -> ArgumentGroup<'_> {
        ArgumentGroup::new(self.registry, self.scope.with_heading(title))
    }

    fn add_mutex_group(&mut self, required: bool) -> MutexGroup<'_> {
        let scope = self.registry.open_exclusive(&self.scope, required);
        MutexGroup::new(self.registry, scope)
    }

    fn add_mutex_switch(&mut self, switch: MutexSwitch) -> Result<&mut Self> {
        self.registry.declare_switch(switch, &self.scope)?;
        Ok(self)
    }
}
