/// Identifies the concrete class a wrapper was created for.
///
/// Every wrapper record begins with one of these tags. `Unwrap` compares the
/// tag against the class it expects; on a mismatch the per-class derived
/// hooks re-dispatch to the wrapper's actual class, so an object wrapped as a
/// derived type can be unwrapped through a base-typed struct pointer.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WrapperType {
    App = 1,
    SchemeRegistrar,
    V8StackFrame,
    View,
    Panel,
    Window,
    #[cfg(test)]
    TestPadded,
}
