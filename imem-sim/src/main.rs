mod immediate;
mod stimulus;
mod testbench;

use clap::Parser;
use imem::{AccessMode, InstructionMemory, MemoryConfig, MemoryImage};

use testbench::Testbench;

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum ImageFormat {
    Binary,
    Hex,
}

fn parse_address(arg: &str) -> Result<u16, String> {
    immediate::parse_imm_u16(arg).map_err(|e| e.to_string())
}

fn parse_size(arg: &str) -> Result<u32, String> {
    immediate::parse_imm_u32(arg).map_err(|e| e.to_string())
}

/// Cycle-level testbench for a byte-lane instruction memory
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Filename of the initial memory image
    #[clap(short, long, value_parser)]
    image: String,

    /// Format of the image file
    #[clap(short, long, value_enum, default_value_t = ImageFormat::Hex)]
    format: ImageFormat,

    /// First byte address of the access window
    #[clap(short, long, value_parser = parse_address, default_value = "0x0000")]
    base: u16,

    /// Capacity in bytes, defaults to the image size
    #[clap(short, long, value_parser = parse_size)]
    size: Option<u32>,

    /// Disable the write path
    #[clap(long)]
    read_only: bool,

    /// Filename of the stimulus script to replay
    #[clap(short = 't', long, value_parser)]
    stimulus: Option<String>,

    /// Print the ports after every clock edge
    #[clap(long)]
    trace: bool,

    /// Filename to write the final memory contents to
    #[clap(short, long, value_parser)]
    dump: Option<String>,
}

fn load_image(args: &Args) -> MemoryImage {
    let result = match args.format {
        ImageFormat::Hex => match std::fs::read_to_string(&args.image) {
            Ok(s) => MemoryImage::from_hex_text(&s),
            Err(e) => {
                eprintln!("Unable to read image file {} - {}", args.image, e);
                std::process::exit(1);
            }
        },
        ImageFormat::Binary => match std::fs::read(&args.image) {
            Ok(b) => MemoryImage::from_be_bytes(&b),
            Err(e) => {
                eprintln!("Unable to read image file {} - {}", args.image, e);
                std::process::exit(1);
            }
        },
    };

    match result {
        Ok(img) => img,
        Err(e) => {
            eprintln!("Unable to load image {} - {}", args.image, e);
            std::process::exit(1);
        }
    }
}

fn main() {
    let args = Args::parse();

    let image = load_image(&args);

    let config = MemoryConfig {
        base: args.base,
        size: args
            .size
            .unwrap_or((image.len() as u32).saturating_mul(2)),
        mode: if args.read_only {
            AccessMode::ReadOnly
        } else {
            AccessMode::ReadWrite
        },
    };

    let mut memory = match InstructionMemory::new(config, &image) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Unable to configure memory - {}", e);
            std::process::exit(1);
        }
    };

    println!(
        "Memory 0x{:04x}..0x{:05x} ({} words, {:?})",
        memory.window().base(),
        memory.window().top(),
        memory.window().words(),
        config.mode
    );

    if let Some(stimulus_file) = &args.stimulus {
        let script = match std::fs::read_to_string(stimulus_file) {
            Ok(s) => match stimulus::parse_script(&s) {
                Ok(v) => v,
                Err(e) => {
                    eprintln!("Unable to parse {} - {}", stimulus_file, e);
                    std::process::exit(1);
                }
            },
            Err(e) => {
                eprintln!("Unable to read stimulus file {} - {}", stimulus_file, e);
                std::process::exit(1);
            }
        };

        let mut tb = Testbench::new(&mut memory);
        let result = tb.run(&script);

        if args.trace {
            for r in tb.records() {
                println!("{r}");
            }
        }

        match result {
            Ok(()) => println!(
                "Ran {} cycles, {} checks passed",
                tb.records().len(),
                tb.checks()
            ),
            Err(e) => {
                eprintln!("Stimulus {} failed - {}", stimulus_file, e);
                std::process::exit(1);
            }
        }
    }

    if let Some(output_file) = args.dump {
        let mut txt = memory.snapshot().to_hex_text();
        txt.push('\n');

        if let Err(e) = std::fs::write(&output_file, txt) {
            eprintln!("Unable to write to {} - {}", output_file, e);
            std::process::exit(1);
        }
    }
}
