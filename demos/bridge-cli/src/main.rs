use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use honeycomb_api::{App, Panel, SchemeOptions, SchemeRegistrar, V8StackFrame, View, Window};
use honeycomb_capi::honey_view_t;

use honeycomb_bridge::base::RefPtr;
use honeycomb_bridge::cpptoc::app::AppCppToC;
use honeycomb_bridge::cpptoc::v8_stack_frame::V8StackFrameCppToC;
use honeycomb_bridge::cpptoc::view::ViewCppToC;
use honeycomb_bridge::cpptoc::window::WindowCppToC;
use honeycomb_bridge::ctocpp::app::AppCToCpp;
use honeycomb_bridge::ctocpp::v8_stack_frame::V8StackFrameCToCpp;
use honeycomb_bridge::{shutdown_checker, Module};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Load an embedder module (.so/.dll/.dylib) exporting honey_create_app
    /// instead of using the built-in demo app.
    #[arg(long, value_name = "FILE")]
    module: Option<PathBuf>,

    /// Number of stack frames to marshal across the boundary
    #[arg(long, default_value_t = 3)]
    frames: i32,

    /// Number of windows to route through their base view struct
    #[arg(long, default_value_t = 2)]
    windows: i32,

    /// Verbose bridge logging
    #[arg(short, long)]
    verbose: bool,
}

// ----- Embedder side (built-in stand-in for a loaded module) -----------------

struct DemoApp;

impl App for DemoApp {
    fn on_register_custom_schemes(&self, registrar: &mut (dyn SchemeRegistrar + 'static)) {
        registrar.add_custom_scheme(1, SchemeOptions::STANDARD | SchemeOptions::SECURE);
        registrar.add_custom_scheme(2, SchemeOptions::LOCAL);
    }

    fn on_context_initialized(&self) {
        log::info!("embedder: context initialized");
    }
}

// ----- Library side ----------------------------------------------------------

#[derive(Default)]
struct CliRegistrar {
    schemes: Vec<(i32, SchemeOptions)>,
}

impl SchemeRegistrar for CliRegistrar {
    fn add_custom_scheme(&mut self, scheme_id: i32, options: SchemeOptions) -> bool {
        if self.schemes.iter().any(|(id, _)| *id == scheme_id) {
            return false;
        }
        self.schemes.push((scheme_id, options));
        true
    }
}

struct CliFrame {
    line: i32,
    column: i32,
}

impl V8StackFrame for CliFrame {
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
        self.line == 0
    }
}

struct CliWindow {
    id: i32,
    shown: AtomicBool,
}

impl View for CliWindow {
    fn is_valid(&self) -> bool {
        true
    }
    fn get_id(&self) -> i32 {
        self.id
    }
}

impl Panel for CliWindow {
    fn get_child_count(&self) -> i32 {
        0
    }
}

impl Window for CliWindow {
    fn show(&self) {
        self.shown.store(true, Ordering::SeqCst);
    }
    fn is_shown(&self) -> bool {
        self.shown.load(Ordering::SeqCst)
    }
}

fn obtain_app(args: &Args) -> Result<(Option<Module>, RefPtr<AppCToCpp>)> {
    if let Some(path) = &args.module {
        let module = unsafe { Module::load(path) }
            .with_context(|| format!("loading module {}", path.display()))?;
        let app = unsafe { module.create_app() }?
            .context("module did not provide an app")?;
        return Ok((Some(module), app));
    }
    // Built-in embedder: push the demo app out through the C struct and
    // adopt it back, exactly as a loaded module's app would arrive.
    let app_struct = AppCppToC::wrap(Some(Arc::new(DemoApp) as Arc<dyn App>));
    let app = unsafe { AppCToCpp::wrap(app_struct) }.context("wrapping built-in app")?;
    Ok((None, app))
}

fn run(args: &Args) -> Result<()> {
    let (_module, app) = obtain_app(args)?;

    // Scheme registration: the registrar is lent across the boundary for
    // the duration of the callback.
    let mut registrar = CliRegistrar::default();
    app.on_register_custom_schemes(&mut registrar);
    println!("schemes = {}", registrar.schemes.len());
    for (id, options) in &registrar.schemes {
        println!("  #{id:02}  {options:?}");
    }

    app.on_context_initialized();

    // Stack frames travel the other way: library objects consumed through
    // their structs.
    for i in 0..args.frames {
        let frame: Arc<dyn V8StackFrame> = Arc::new(CliFrame {
            line: 10 * (i + 1),
            column: i + 1,
        });
        let s = V8StackFrameCppToC::wrap(Some(frame));
        let remote = unsafe { V8StackFrameCToCpp::wrap(s) }.context("wrapping stack frame")?;
        println!(
            "frame #{i}: line={} column={} eval={}",
            remote.get_line_number(),
            remote.get_column(),
            remote.is_eval()
        );
    }

    // Windows are handed out as plain views; unwrap re-resolves the
    // concrete class from the wrapper tag.
    for i in 0..args.windows {
        let window = Arc::new(CliWindow {
            id: 100 + i,
            shown: AtomicBool::new(false),
        });
        let s = WindowCppToC::wrap(Some(Arc::clone(&window) as Arc<dyn Window>));
        let view = unsafe { ViewCppToC::unwrap(s.cast::<honey_view_t>()) }
            .context("unwrapping window as view")?;
        window.show();
        println!(
            "view #{}: valid={} shown={}",
            view.get_id(),
            view.is_valid(),
            window.is_shown()
        );
    }

    Ok(())
}

fn main() {
    let args = Args::parse();

    let level = if args.verbose {
        tracing_subscriber::filter::LevelFilter::DEBUG
    } else {
        tracing_subscriber::filter::LevelFilter::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    let status = match run(&args) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("error: {e:#}");
            1
        }
    };

    // All wrappers are gone; any bridge traffic past this point is a bug.
    shutdown_checker::set_is_shutdown();
    std::process::exit(status);
}
