//! brr - decode, dump, export and play SNES BRR samples

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;

use brr::playback::{parse_adsr, parse_gain, parse_index, parse_number, parse_sample_rate};
use brr::{export_to_wav, load_blocks, BlockDump, Playback, PlaybackConfig};

/// Render cap for looping samples when none is given
const DEFAULT_MAX_SECONDS: f64 = 600.0;

#[derive(Parser, Debug)]
#[command(name = "brr", version, about = "Decode and play SNES BRR samples")]
struct Cli {
    /// File holding BRR data
    input: PathBuf,

    /// Byte offset of the first block (decimal, 0x.. or $..)
    #[arg(long, value_parser = parse_number)]
    offset: Option<u64>,

    /// ADSR register value, 16 bits (e.g. 0x8FE0)
    #[arg(long, value_parser = parse_adsr)]
    adsr: Option<[u8; 2]>,

    /// Gain register value, 8 bits (ignored when --adsr is given)
    #[arg(long, value_parser = parse_gain)]
    gain: Option<u8>,

    /// Decode at most this many blocks (also accepts input without an END block)
    #[arg(long = "end-block", value_parser = parse_index)]
    end_block: Option<usize>,

    /// Block index to loop back to after the last block
    #[arg(short = 'l', long = "loop-block", value_parser = parse_index)]
    loop_block: Option<usize>,

    /// Output sample rate in Hz
    #[arg(short = 'r', long = "rate", value_parser = parse_sample_rate)]
    sample_rate: Option<u32>,

    /// JSON configuration file (command line flags take precedence)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the rendered sample to a WAV file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Longest render for looping samples, in seconds
    #[arg(long = "max-seconds", default_value_t = DEFAULT_MAX_SECONDS)]
    max_seconds: f64,

    /// Play through the default audio device
    #[arg(short, long)]
    play: bool,

    /// Print every block with its nibbles and decoded samples
    #[arg(short, long)]
    dump: bool,

    /// Print the block dump as JSON
    #[arg(long, requires = "dump")]
    json: bool,

    /// Log level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Merge the optional config file with command line overrides
    fn resolve_config(&self) -> anyhow::Result<PlaybackConfig> {
        let mut config = match &self.config {
            Some(path) => PlaybackConfig::from_json_file(path)?,
            None => PlaybackConfig::default(),
        };

        if let Some(offset) = self.offset {
            config.offset = offset;
        }
        if self.adsr.is_some() {
            config.adsr = self.adsr;
        }
        if self.gain.is_some() {
            config.gain = self.gain;
        }
        if self.end_block.is_some() {
            config.end_block_override = self.end_block;
        }
        if self.loop_block.is_some() {
            config.loop_block = self.loop_block;
        }
        if let Some(rate) = self.sample_rate {
            config.sample_rate = rate;
        }

        config.validate()?;
        Ok(config)
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn print_dump(dumps: &[BlockDump], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(dumps)?);
    } else {
        for dump in dumps {
            println!("{}", dump);
        }
    }
    Ok(())
}

#[cfg(feature = "streaming")]
fn play(playback: Playback) -> anyhow::Result<()> {
    use brr::streaming::STATUS_POLL_MS;
    use brr::AudioDevice;
    use std::io::Write;

    let device = AudioDevice::new(playback)?;
    println!("Playing - press Ctrl+C to stop");

    while !device.is_finished() {
        std::thread::sleep(std::time::Duration::from_millis(STATUS_POLL_MS));
        let stats = device.stats();
        print!(
            "\x1B[2K\rSamples: {:>9} | Loops: {:>5} | Envelope: {:#05x}",
            stats.samples_played, stats.loop_count, stats.envelope_level
        );
        std::io::stdout().flush().ok();
    }
    println!("\nPlayback complete!");
    Ok(())
}

#[cfg(not(feature = "streaming"))]
fn play(_playback: Playback) -> anyhow::Result<()> {
    bail!("Live playback requires the \"streaming\" feature. Rebuild with `--features streaming`.")
}

fn run(cli: Cli) -> anyhow::Result<()> {
    if cli.output.is_none() && !cli.play && !cli.dump {
        bail!("Nothing to do: pass --output <file.wav>, --play or --dump");
    }

    let config = cli.resolve_config()?;
    let blocks = load_blocks(&cli.input, &config)
        .with_context(|| format!("Failed to decode '{}'", cli.input.display()))?;

    let playback = Playback::new(blocks, &config)?;
    println!(
        "Loaded {} blocks ({} samples per pass) from {}",
        playback.stream().blocks().len(),
        playback.stream().len_per_pass(),
        cli.input.display()
    );

    if cli.dump {
        print_dump(&BlockDump::collect(playback.stream().blocks()), cli.json)?;
    }

    if let Some(output) = &cli.output {
        let mut playback = playback.clone();
        println!("Envelope: {}", playback.envelope());
        let cap = playback
            .is_looping()
            .then(|| (cli.max_seconds * f64::from(config.sample_rate)) as usize);
        let written = export_to_wav(&mut playback, output, cap)
            .with_context(|| format!("Failed to write '{}'", output.display()))?;
        if !playback.is_finished() {
            println!(
                "Loop still audible after {:.1}s; render stopped at the cap",
                cli.max_seconds
            );
        }
        println!(
            "Wrote {} samples ({:.2}s) to {}",
            written,
            playback.elapsed_seconds(),
            output.display()
        );
    }

    if cli.play {
        play(playback)?;
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    run(cli)
}
