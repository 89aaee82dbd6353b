//! Sonomata - a cellular automaton you can hear
//!
//! Every row of the board is a beat, every live cell a note of the chord.

use std::process;
use std::thread;
use std::time::Duration;

use clap::Parser;

use sonomata::audio::{AudioSystem, SilentSink};
use sonomata::cli::Args;
use sonomata::params::MixerConfig;
use sonomata::session::{RunSummary, Session};
use sonomata::synthesis::{NoteBank, WavDirStore};
use sonomata::view::TerminalView;
use sonomata::Result;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    println!("Sonomata - sonified cellular automaton");
    println!("Initializing...\n");

    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let mut rng = args.rng();
    let board = args.board(&mut rng)?;
    let run = args.run_config(board.size())?;
    let music = args.music_config(&mut rng)?;
    let tail = Duration::from_millis(run.note_length.max_ms);

    if args.wipe_cache {
        WavDirStore::wipe(&args.sample)?;
    }
    let bank = NoteBank::new(&args.sample, WavDirStore);
    let view = TerminalView::new(args.show);

    let summary: RunSummary = if args.no_audio {
        Session::new(board, bank, SilentSink, view, run, music, rng)?.run()?
    } else {
        let audio = AudioSystem::new(MixerConfig::default())?;
        let summary = Session::new(board, bank, audio, view, run, music, rng)?.run()?;
        // Let the last notes ring out before the stream is dropped
        thread::sleep(tail);
        summary
    };

    println!(
        "\nDone: {} cycles played, {} skipped, {} notes",
        summary.cycles_played, summary.cycles_skipped, summary.notes
    );

    if args.discard_cache {
        WavDirStore::wipe(&args.sample)?;
    }
    Ok(())
}
