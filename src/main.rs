use colored::Colorize;

fn main() {
    prop_shape::logging::init_tracing();
    let command_line_interface = prop_shape::cli::CommandLineInterface::load();
    if let Err(error) = command_line_interface.run() {
        eprintln!("{} {error:#}", "error:".red().bold());
        std::process::exit(1);
    }
}
