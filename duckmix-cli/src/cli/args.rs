//! CLI argument definitions for `duckmix`.

use clap::{Arg, ArgAction, Command};

/// Build the CLI argument parser and command definitions.
pub fn build_cli() -> Command {
    // Build the CLI definition in one place to keep main.rs slim.
    Command::new("duckmix")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Mix background music with a voice-over: delayed start, dynamic ducking, fade-in/out, and a music tail after the voice ends")
        .arg_required_else_help(true)
        .arg(
            Arg::new("music")
                .long("music")
                .short('m')
                .value_name("PATH")
                .required(true)
                .help("Path to the background music file"),
        )
        .arg(
            Arg::new("voice")
                .long("voice")
                .short('v')
                .value_name("PATH")
                .required(true)
                .help("Path to the voice-over file"),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .value_name("PATH")
                .default_value("output.wav")
                .help("Output WAV path"),
        )
        .arg(
            Arg::new("delay")
                .long("delay")
                .value_name("SECONDS")
                .default_value("5")
                .help("Delay before the voice starts (seconds)"),
        )
        .arg(
            Arg::new("duck-db")
                .long("duck-db")
                .value_name("DB")
                .default_value("-10")
                .allow_hyphen_values(true)
                .help("Music gain offset while the voice is active (dB)"),
        )
        .arg(
            Arg::new("silence-thresh")
                .long("silence-thresh")
                .value_name("DBFS")
                .default_value("-30")
                .allow_hyphen_values(true)
                .help("Silence threshold (dBFS); lower values detect more speech"),
        )
        .arg(
            Arg::new("min-silence-ms")
                .long("min-silence-ms")
                .value_name("MS")
                .default_value("500")
                .help("Minimum silence duration separating speech segments (ms)"),
        )
        .arg(
            Arg::new("fade-in-ms")
                .long("fade-in-ms")
                .value_name("MS")
                .default_value("2000")
                .help("Music fade-in at the start (ms)"),
        )
        .arg(
            Arg::new("fade-out-ms")
                .long("fade-out-ms")
                .value_name("MS")
                .default_value("2000")
                .help("Fade-out at the end (ms)"),
        )
        .arg(
            Arg::new("post-voice-ms")
                .long("post-voice-ms")
                .value_name("MS")
                .default_value("10000")
                .help("Music tail kept after the voice ends (ms)"),
        )
        .arg(
            Arg::new("voice-boost-db")
                .long("voice-boost-db")
                .value_name("DB")
                .default_value("3")
                .allow_hyphen_values(true)
                .help("Voice gain applied before detection and overlay (dB)"),
        )
        .arg(
            Arg::new("transition-ms")
                .long("transition-ms")
                .value_name("MS")
                .default_value("200")
                .help("Duration of the ramps into and out of ducking (ms)"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Enable debug logging"),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let matches = build_cli()
            .try_get_matches_from(["duckmix", "--music", "m.mp3", "--voice", "v.wav"])
            .expect("parse");
        assert_eq!(matches.get_one::<String>("output").unwrap(), "output.wav");
        assert_eq!(matches.get_one::<String>("delay").unwrap(), "5");
        assert_eq!(matches.get_one::<String>("duck-db").unwrap(), "-10");
        assert_eq!(matches.get_one::<String>("silence-thresh").unwrap(), "-30");
        assert_eq!(matches.get_one::<String>("min-silence-ms").unwrap(), "500");
        assert_eq!(matches.get_one::<String>("post-voice-ms").unwrap(), "10000");
        assert_eq!(matches.get_one::<String>("transition-ms").unwrap(), "200");
    }

    #[test]
    fn negative_values_are_accepted() {
        let matches = build_cli()
            .try_get_matches_from([
                "duckmix", "--music", "m.mp3", "--voice", "v.wav", "--duck-db", "-14",
                "--silence-thresh", "-45", "--voice-boost-db", "-2",
            ])
            .expect("parse");
        assert_eq!(matches.get_one::<String>("duck-db").unwrap(), "-14");
        assert_eq!(matches.get_one::<String>("silence-thresh").unwrap(), "-45");
        assert_eq!(matches.get_one::<String>("voice-boost-db").unwrap(), "-2");
    }

    #[test]
    fn music_and_voice_are_required() {
        assert!(build_cli()
            .try_get_matches_from(["duckmix", "--music", "m.mp3"])
            .is_err());
    }
}
