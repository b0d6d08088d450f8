use gantry::engine::exec::ExecuteError;
use gantry::ui::output;

fn main() {
    if let Err(err) = gantry::cli::run() {
        output::error(format!("{:#}", err));

        // A failing pipeline step propagates the child's exit code as the
        // overall process exit code. Everything else exits 1.
        let code = err
            .downcast_ref::<ExecuteError>()
            .map(ExecuteError::exit_code)
            .unwrap_or(1);
        std::process::exit(code);
    }
}
