use std::io::BufRead;
use std::thread;

use lexi_core::EventSink;
use lexi_types::AppEvent;

pub const HELP: &str = "\
Type a word to look it up.
  :voice  (:v)  start/stop voice input
  :play   (:p)  play the pronunciation
  :speak  (:s)  read the meanings aloud / stop reading
  :help   (:h)  show this help
  :quit   (:q)  exit
";

/// One line of user input
#[derive(Debug)]
pub enum Input {
    Event(AppEvent),
    Help,
    Unknown(String),
    Blank,
}

pub fn parse_input(line: &str) -> Input {
    let line = line.trim();
    if line.is_empty() {
        return Input::Blank;
    }

    let Some(command) = line.strip_prefix(':') else {
        return Input::Event(AppEvent::Search(line.to_string()));
    };

    match command {
        "voice" | "v" => Input::Event(AppEvent::ToggleVoiceInput),
        "play" | "p" => Input::Event(AppEvent::PlayPronunciation),
        "speak" | "s" => Input::Event(AppEvent::ToggleMeaningPlayback),
        "quit" | "q" => Input::Event(AppEvent::Shutdown),
        "help" | "h" => Input::Help,
        other => Input::Unknown(other.to_string()),
    }
}

/// Read commands from stdin on a dedicated thread
pub fn spawn_input_reader(sink: EventSink) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        if atty::is(atty::Stream::Stdin) {
            print!("{HELP}");
        }

        read_commands(std::io::stdin().lock(), &sink);
    })
}

/// Forward commands until `:quit` (sends `Shutdown`) or end of input
/// (sends `InputClosed`, letting queued work finish)
pub fn read_commands(reader: impl BufRead, sink: &EventSink) {
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::error!("Failed to read stdin: {}", e);
                break;
            }
        };

        match parse_input(&line) {
            Input::Event(AppEvent::Shutdown) => {
                tracing::debug!("Quit requested");
                sink.emit(AppEvent::Shutdown);
                return;
            }
            Input::Event(event) => sink.emit(event),
            Input::Help => print!("{HELP}"),
            Input::Unknown(command) => println!("Unknown command :{command}, try :help"),
            Input::Blank => {}
        }
    }

    tracing::debug!("Input closed");
    sink.emit(AppEvent::InputClosed);
}
