use dotboy::Options;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let options = match Options::parse(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(err) => {
            eprintln!("{err:#}");
            std::process::exit(2);
        }
    };

    dotboy::run(&options)
}
