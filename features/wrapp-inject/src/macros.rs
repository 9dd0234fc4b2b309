//! Macros for declaring components.

/// Builds the slot list of a component from its field names.
///
/// Each field must be a [Slot](crate::Slot), the field name is used in error messages.
///
/// # Examples
///
/// ```
/// use wrapp_inject::{slots, Component, Slot, SlotRef};
///
/// struct Engine;
/// impl Component for Engine {}
///
/// struct Car {
///     engine: Slot<Engine>,
///     spare: Slot<Engine>,
/// }
///
/// impl Component for Car {
///     fn slots(&self) -> Vec<SlotRef<'_>> {
///         slots!(self; engine, spare)
///     }
/// }
/// ```
#[macro_export]
macro_rules! slots {
    ($this:expr; $($field:ident),* $(,)?) => {
        vec![
            $($crate::SlotRef::new(stringify!($field), &$this.$field)),*
        ]
    };
}
