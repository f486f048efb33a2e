use vidar::cli::{self, Cli};
use vidar::logging;
use vidar::ui::output;

fn main() {
    let args = Cli::parse_args();
    logging::init(args.debug);

    if let Err(err) = cli::run(args) {
        output::error(format!("{:#}", err));
        std::process::exit(1);
    }
}
