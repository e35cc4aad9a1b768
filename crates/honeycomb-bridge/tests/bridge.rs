//! Two-sided bridge tests: native objects on each side of the boundary,
//! structs traveling between them, ownership and identity observed from
//! both ends.

use std::ptr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use honeycomb_api::{App, Panel, SchemeOptions, SchemeRegistrar, V8StackFrame, View, Window};
use honeycomb_capi::{
    honey_base_ref_counted_t, honey_panel_t, honey_v8_stack_frame_t, honey_view_t,
};

use honeycomb_bridge::cpptoc::app::AppCppToC;
use honeycomb_bridge::cpptoc::panel::PanelCppToC;
use honeycomb_bridge::cpptoc::scheme_registrar::SchemeRegistrarCppToC;
use honeycomb_bridge::cpptoc::scoped::CppToCScoped;
use honeycomb_bridge::cpptoc::v8_stack_frame::V8StackFrameCppToC;
use honeycomb_bridge::cpptoc::view::ViewCppToC;
use honeycomb_bridge::cpptoc::window::WindowCppToC;
use honeycomb_bridge::ctocpp::app::AppCToCpp;
use honeycomb_bridge::ctocpp::scheme_registrar::SchemeRegistrarCToCpp;
use honeycomb_bridge::ctocpp::scoped::CToCppScoped;
use honeycomb_bridge::ctocpp::v8_stack_frame::V8StackFrameCToCpp;
use honeycomb_bridge::ctocpp::view::ViewCToCpp;
use honeycomb_bridge::ctocpp::window::WindowCToCpp;

// ----- Native test objects ---------------------------------------------------

struct TestApp {
    context_initialized: AtomicBool,
    drops: Arc<AtomicUsize>,
}

impl TestApp {
    fn new(drops: Arc<AtomicUsize>) -> Self {
        Self {
            context_initialized: AtomicBool::new(false),
            drops,
        }
    }
}

impl App for TestApp {
    fn on_register_custom_schemes(&self, registrar: &mut (dyn SchemeRegistrar + 'static)) {
        assert!(registrar.add_custom_scheme(10, SchemeOptions::STANDARD));
        assert!(!registrar.add_custom_scheme(10, SchemeOptions::STANDARD));
        assert!(registrar.add_custom_scheme(11, SchemeOptions::LOCAL | SchemeOptions::SECURE));
    }

    fn on_context_initialized(&self) {
        self.context_initialized.store(true, Ordering::SeqCst);
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self.drops.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
struct NativeRegistrar {
    schemes: Vec<(i32, SchemeOptions)>,
}

impl SchemeRegistrar for NativeRegistrar {
    fn add_custom_scheme(&mut self, scheme_id: i32, options: SchemeOptions) -> bool {
        if self.schemes.iter().any(|(id, _)| *id == scheme_id) {
            return false;
        }
        self.schemes.push((scheme_id, options));
        true
    }
}

struct CountingRegistrar {
    inner: NativeRegistrar,
    drops: Arc<AtomicUsize>,
}

impl SchemeRegistrar for CountingRegistrar {
    fn add_custom_scheme(&mut self, scheme_id: i32, options: SchemeOptions) -> bool {
        self.inner.add_custom_scheme(scheme_id, options)
    }
}

impl Drop for CountingRegistrar {
    fn drop(&mut self) {
        self.drops.fetch_add(1, Ordering::SeqCst);
    }
}

struct TestFrame {
    line: i32,
    column: i32,
}

impl V8StackFrame for TestFrame {
    fn is_valid(&self) -> bool {
        true
    }
    fn get_line_number(&self) -> i32 {
        self.line
    }
    fn get_column(&self) -> i32 {
        self.column
    }
    fn is_eval(&self) -> bool {
        false
    }
}

struct TestView {
    id: i32,
}

impl View for TestView {
    fn is_valid(&self) -> bool {
        true
    }
    fn get_id(&self) -> i32 {
        self.id
    }
}

struct TestWindow {
    id: i32,
    children: i32,
    shown: AtomicBool,
}

impl View for TestWindow {
    fn is_valid(&self) -> bool {
        true
    }
    fn get_id(&self) -> i32 {
        self.id
    }
}

impl Panel for TestWindow {
    fn get_child_count(&self) -> i32 {
        self.children
    }
}

impl Window for TestWindow {
    fn show(&self) {
        self.shown.store(true, Ordering::SeqCst);
    }
    fn is_shown(&self) -> bool {
        self.shown.load(Ordering::SeqCst)
    }
}

fn same_data_ptr<T: ?Sized, U: ?Sized>(a: &Arc<T>, b: &Arc<U>) -> bool {
    ptr::eq(Arc::as_ptr(a).cast::<()>(), Arc::as_ptr(b).cast::<()>())
}

// ----- Two-sided scenarios ---------------------------------------------------

#[test]
fn app_callbacks_cross_both_directions() {
    let drops = Arc::new(AtomicUsize::new(0));
    let app: Arc<TestApp> = Arc::new(TestApp::new(Arc::clone(&drops)));

    // Embedder side: hand the app across as a struct.
    let app_struct = AppCppToC::wrap(Some(Arc::clone(&app) as Arc<dyn App>));
    assert!(!app_struct.is_null());

    // Library side: adopt it and drive the callbacks.
    let remote = unsafe { AppCToCpp::wrap(app_struct) }.unwrap();
    let mut registrar = NativeRegistrar::default();
    remote.on_register_custom_schemes(&mut registrar);
    remote.on_context_initialized();

    // The registrar crossing is re-entrant: library -> embedder -> library.
    assert_eq!(
        registrar.schemes,
        vec![
            (10, SchemeOptions::STANDARD),
            (11, SchemeOptions::LOCAL | SchemeOptions::SECURE),
        ]
    );
    assert!(app.context_initialized.load(Ordering::SeqCst));

    // Dropping the last remote reference releases the embedder object.
    drop(remote);
    assert_eq!(drops.load(Ordering::SeqCst), 0);
    drop(app);
    assert_eq!(drops.load(Ordering::SeqCst), 1);
}

#[test]
fn wrapping_is_idempotent_on_both_sides() {
    let app: Arc<dyn App> = Arc::new(TestApp::new(Arc::new(AtomicUsize::new(0))));

    let s1 = AppCppToC::wrap(Some(Arc::clone(&app)));
    let s2 = AppCppToC::wrap(Some(Arc::clone(&app)));
    assert_eq!(s1, s2);

    // Each wrap above was a transfer carrying its own reference; each
    // adoption below consumes one.
    let r1 = unsafe { AppCToCpp::wrap(s1) }.unwrap();
    let r2 = unsafe { AppCToCpp::wrap(s2) }.unwrap();
    assert!(ptr::eq(r1.as_ptr(), r2.as_ptr()));

    // Both traveling references were consumed by the wraps above; r1/r2 and
    // the local Arc are the only holders left.
    drop(r1);
    drop(r2);
}

#[test]
fn concurrent_rewrap_never_loses_the_object() {
    let drops = Arc::new(AtomicUsize::new(0));
    let app = Arc::new(TestApp::new(Arc::clone(&drops)));

    // Wrapper records die and get rebuilt under each other's feet here; a
    // record found in the registry must either be revived before its last
    // reference is gone or be replaced, never resurrected mid-destruction.
    let threads: Vec<_> = (0..4)
        .map(|_| {
            let app = Arc::clone(&app);
            std::thread::spawn(move || {
                let app: Arc<dyn App> = app;
                for _ in 0..500 {
                    let s = AppCppToC::wrap(Some(Arc::clone(&app)));
                    assert!(!s.is_null());
                    let back = unsafe { AppCppToC::unwrap(s) }.unwrap();
                    assert!(same_data_ptr(&back, &app));
                }
            })
        })
        .collect();
    for t in threads {
        t.join().unwrap();
    }

    assert_eq!(drops.load(Ordering::SeqCst), 0);
    drop(app);
    assert_eq!(drops.load(Ordering::SeqCst), 1);
}

#[test]
fn unwrap_returns_the_original_object() {
    let frame: Arc<dyn V8StackFrame> = Arc::new(TestFrame { line: 3, column: 9 });
    let s = V8StackFrameCppToC::wrap(Some(Arc::clone(&frame)));
    let back = unsafe { V8StackFrameCppToC::unwrap(s) }.unwrap();
    assert!(same_data_ptr(&back, &frame));
}

#[test]
fn frame_calls_forward_through_the_struct() {
    let frame: Arc<dyn V8StackFrame> = Arc::new(TestFrame { line: 14, column: 2 });
    let s = V8StackFrameCppToC::wrap(Some(frame));

    let remote = unsafe { V8StackFrameCToCpp::wrap(s) }.unwrap();
    assert!(remote.is_valid());
    assert_eq!(remote.get_line_number(), 14);
    assert_eq!(remote.get_column(), 2);
    assert!(!remote.is_eval());
}

// ----- Derived resolution ----------------------------------------------------

#[test]
fn window_unwraps_through_base_view_struct() {
    let window = Arc::new(TestWindow {
        id: 77,
        children: 3,
        shown: AtomicBool::new(false),
    });
    let s = WindowCppToC::wrap(Some(Arc::clone(&window) as Arc<dyn Window>));

    // The other side only knows it has a view.
    let view = unsafe { ViewCppToC::unwrap(s.cast::<honey_view_t>()) }.unwrap();
    assert_eq!(view.get_id(), 77);
    assert!(same_data_ptr(
        &view,
        &(Arc::clone(&window) as Arc<dyn Window>)
    ));
}

#[test]
fn window_unwraps_through_base_panel_struct() {
    let window = Arc::new(TestWindow {
        id: 78,
        children: 5,
        shown: AtomicBool::new(false),
    });
    let s = WindowCppToC::wrap(Some(Arc::clone(&window) as Arc<dyn Window>));

    let panel = unsafe { PanelCppToC::unwrap(s.cast::<honey_panel_t>()) }.unwrap();
    assert_eq!(panel.get_child_count(), 5);
}

#[test]
fn remote_window_unwraps_as_view_to_the_same_struct() {
    let window: Arc<dyn Window> = Arc::new(TestWindow {
        id: 79,
        children: 0,
        shown: AtomicBool::new(false),
    });
    let s = WindowCppToC::wrap(Some(window));

    let remote = unsafe { WindowCToCpp::wrap(s) }.unwrap();
    remote.show();
    assert!(remote.is_shown());
    assert_eq!(remote.get_id(), 79);

    // Sending it back as a view resolves through the window forwarder and
    // yields the same struct it arrived in.
    let back = unsafe { ViewCToCpp::unwrap(Some(&*remote)) };
    assert_eq!(back, s.cast::<honey_view_t>());

    // Drop the reference that traveled with the unwrap.
    unsafe {
        let base = back.cast::<honey_base_ref_counted_t>();
        (*base).release.unwrap()(base);
    }
}

#[test]
#[should_panic(expected = "unexpected class type")]
fn unwrapping_a_view_as_panel_is_a_caller_bug() {
    let view: Arc<dyn View> = Arc::new(TestView { id: 5 });
    let s = ViewCppToC::wrap(Some(view));
    // A plain view was never a panel; the leaf hook refuses.
    let _ = unsafe { PanelCppToC::unwrap(s.cast::<honey_panel_t>()) };
}

// ----- Scoped ownership ------------------------------------------------------

#[test]
fn scoped_ownership_travels_and_returns_exactly_once() {
    let drops = Arc::new(AtomicUsize::new(0));
    let registrar: Box<dyn SchemeRegistrar> = Box::new(CountingRegistrar {
        inner: NativeRegistrar::default(),
        drops: Arc::clone(&drops),
    });

    let s = CppToCScoped::<SchemeRegistrarCppToC>::wrap_own(Some(registrar));
    assert!(!s.is_null());

    // Other side uses it, then passes ownership back.
    let mut remote = unsafe { CToCppScoped::<SchemeRegistrarCToCpp>::wrap(s) }.unwrap();
    assert!(remote.add_custom_scheme(1, SchemeOptions::STANDARD));
    let returned = CToCppScoped::unwrap_own(remote);
    assert_eq!(returned, s);

    let back = unsafe { CppToCScoped::<SchemeRegistrarCppToC>::unwrap_own(returned) }.unwrap();
    // Wrapper destruction did not touch the object.
    assert_eq!(drops.load(Ordering::SeqCst), 0);
    drop(back);
    assert_eq!(drops.load(Ordering::SeqCst), 1);
}

#[test]
fn scoped_del_destroys_wrapper_and_object_together() {
    let drops = Arc::new(AtomicUsize::new(0));
    let registrar: Box<dyn SchemeRegistrar> = Box::new(CountingRegistrar {
        inner: NativeRegistrar::default(),
        drops: Arc::clone(&drops),
    });

    let s = CppToCScoped::<SchemeRegistrarCppToC>::wrap_own(Some(registrar));
    // Receiver destroys through the struct; wrapper drop releases the object.
    drop(unsafe { CToCppScoped::<SchemeRegistrarCToCpp>::wrap(s) }.unwrap());
    assert_eq!(drops.load(Ordering::SeqCst), 1);
}

#[test]
fn borrowed_registrar_survives_its_wrapper() {
    let mut registrar = NativeRegistrar::default();
    {
        let mut handle = SchemeRegistrarCppToC::wrap_raw(Some(&mut registrar)).unwrap();
        let s = handle.get_struct();
        // A borrowing wrapper never exposes del.
        assert!(unsafe { (*s).base.del }.is_none());

        let mut remote = unsafe { CToCppScoped::<SchemeRegistrarCToCpp>::wrap(s) }.unwrap();
        assert!(remote.add_custom_scheme(2, SchemeOptions::CORS_ENABLED));
    }
    // Both wrappers are gone; the object is untouched and saw the call.
    assert_eq!(registrar.schemes, vec![(2, SchemeOptions::CORS_ENABLED)]);
}

#[test]
fn unwrap_raw_reaches_the_borrowed_object() {
    let mut registrar = NativeRegistrar::default();
    {
        let mut handle = SchemeRegistrarCppToC::wrap_raw(Some(&mut registrar)).unwrap();
        let s = handle.get_struct();

        // Borrow the object straight out of the struct and mutate through it.
        let mut object = unsafe { CppToCScoped::<SchemeRegistrarCppToC>::unwrap_raw(s) }.unwrap();
        assert!(unsafe { object.as_mut() }.add_custom_scheme(3, SchemeOptions::LOCAL));

        // The wrapper is untouched and still routes calls.
        let mut remote = unsafe { CToCppScoped::<SchemeRegistrarCToCpp>::wrap(s) }.unwrap();
        assert!(!remote.add_custom_scheme(3, SchemeOptions::LOCAL));
        // unwrap_raw on the consuming side hands back the same struct.
        assert_eq!(CToCppScoped::unwrap_raw(&remote), s);
    }
    assert_eq!(registrar.schemes, vec![(3, SchemeOptions::LOCAL)]);
}

// ----- Null propagation ------------------------------------------------------

#[test]
fn null_and_none_propagate_without_wrappers() {
    assert!(AppCppToC::wrap(None).is_null());
    assert!(unsafe { AppCppToC::unwrap(ptr::null_mut()) }.is_none());
    assert!(unsafe { AppCToCpp::wrap(ptr::null_mut()) }.is_none());
    assert!(unsafe { AppCToCpp::unwrap(None) }.is_null());

    assert!(CppToCScoped::<SchemeRegistrarCppToC>::wrap_own(None).is_null());
    assert!(unsafe { CppToCScoped::<SchemeRegistrarCppToC>::unwrap_own(ptr::null_mut()) }.is_none());
    assert!(SchemeRegistrarCppToC::wrap_raw(None).is_none());
    assert!(unsafe { CToCppScoped::<SchemeRegistrarCToCpp>::wrap(ptr::null_mut()) }.is_none());

    assert!(unsafe { ViewCppToC::unwrap(ptr::null_mut()) }.is_none());
    assert!(unsafe { ViewCToCpp::unwrap(None) }.is_null());
}

// ----- Version skew ----------------------------------------------------------

#[test]
fn older_struct_members_degrade_to_defaults() {
    unsafe extern "C" fn frame_is_valid(_self: *mut honey_v8_stack_frame_t) -> i32 {
        1
    }
    unsafe extern "C" fn frame_get_line_number(_self: *mut honey_v8_stack_frame_t) -> i32 {
        21
    }

    // A struct from an older module: the recorded size stops after
    // get_line_number, and there is no refcount plumbing to speak of.
    let mut frame: honey_v8_stack_frame_t = unsafe { std::mem::zeroed() };
    frame.base.size = std::mem::size_of::<honey_base_ref_counted_t>()
        + 2 * std::mem::size_of::<Option<unsafe extern "C" fn()>>();
    frame.is_valid = Some(frame_is_valid);
    frame.get_line_number = Some(frame_get_line_number);

    let remote = unsafe { V8StackFrameCToCpp::wrap(&mut frame) }.unwrap();
    assert!(remote.is_valid());
    assert_eq!(remote.get_line_number(), 21);
    // Declared after the recorded size: never called, defaults returned.
    assert_eq!(remote.get_column(), 0);
    assert!(!remote.is_eval());
    drop(remote);
}
