use dotboy::{RunOptions, Verdict, DEFAULT_FRAMES};

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let Some(rom_path) = args.next() else {
        eprintln!(
            "No ROM path provided.\n\
             Usage: dotboy <rom_path> [frames]\n\
             Example: dotboy cpu_instrs/individual/01-special.gb 3000"
        );
        std::process::exit(2);
    };

    let frames = match args.next() {
        Some(arg) => match arg.parse::<usize>() {
            Ok(frames) => frames,
            Err(_) => {
                eprintln!("Invalid frame count '{arg}'");
                std::process::exit(2);
            }
        },
        None => DEFAULT_FRAMES,
    };

    let options = RunOptions::builder().rom_path(rom_path).frames(frames).build();
    let mut stdout = std::io::stdout().lock();

    match dotboy::run(&options, &mut stdout) {
        Ok(summary) if summary.verdict == Verdict::Failed => std::process::exit(1),
        Ok(_) => {}
        Err(err) => {
            log::error!("{err:#}");
            eprintln!("error: {err:#}");
            std::process::exit(1);
        }
    }
}
