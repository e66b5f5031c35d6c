//! CLI execution: argument extraction and the mix run.

use std::error::Error;
use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;

use clap::ArgMatches;
use duckmix_lib::mixer::MixSettings;
use duckmix_lib::pipeline;

/// Execute a mix run from parsed CLI arguments.
pub fn run(args: &ArgMatches) -> Result<i32, Box<dyn Error>> {
    let settings = MixSettings {
        delay_seconds: parse_arg(args, "delay")?,
        duck_db: parse_arg(args, "duck-db")?,
        silence_thresh: parse_arg(args, "silence-thresh")?,
        min_silence_ms: parse_arg(args, "min-silence-ms")?,
        fade_in_ms: parse_arg(args, "fade-in-ms")?,
        fade_out_ms: parse_arg(args, "fade-out-ms")?,
        post_voice_duration_ms: parse_arg(args, "post-voice-ms")?,
        voice_boost_db: parse_arg(args, "voice-boost-db")?,
        transition_ms: parse_arg(args, "transition-ms")?,
    };

    let music = args.get_one::<String>("music").unwrap();
    let voice = args.get_one::<String>("voice").unwrap();
    let output = args.get_one::<String>("output").unwrap();

    let metadata = pipeline::mix_files(
        Path::new(music),
        Path::new(voice),
        Path::new(output),
        &settings,
    )?;

    println!("{}", serde_json::to_string_pretty(&metadata)?);
    Ok(0)
}

/// Parse a defaulted argument value, reporting the flag name on failure.
fn parse_arg<T>(args: &ArgMatches, name: &str) -> Result<T, Box<dyn Error>>
where
    T: FromStr,
    T::Err: Display,
{
    let value = args.get_one::<String>(name).unwrap();
    value
        .parse()
        .map_err(|err| format!("invalid value for --{}: {}", name, err).into())
}
