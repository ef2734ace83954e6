/// Line-oriented command shell over `MusicService`
///
/// Parsing is pure; `execute` runs one command against the service and
/// returns the text to print.
use crate::error::{CliError, Result};
use groove_core::{Playlist, PlaylistId, Track, TrackId, UpdateTrack};
use groove_playback::{PlaybackError, PlaybackState, TransportSnapshot};
use groove_service::{MusicService, ServiceError};
use std::fmt::Write as _;
use std::time::Duration;

pub const HELP: &str = "\
Playback:
  play <track>              play a library track (number or ID)
  pause | resume            pause or resume the current track
  next | prev               skip forward or back
  seek <seconds>            jump within the current track
  vol <0.0-1.0>             set volume
  mute                      toggle mute
  shuffle                   toggle shuffle
  repeat                    cycle repeat off -> all -> one
  status                    show what is playing
Queue:
  queue                     show the play queue
  enqueue <track>           append to the queue
  playnext <track>          insert after the current entry
  dequeue <n>               remove queue entry n
  clearqueue                empty the queue
Library:
  list                      list library tracks
  search <text>             search title, artist and album
  tag <track> <field> <value>   set title, artist or album
  remove <track>            remove a track from the library
  clear                     remove every track
Playlists:
  playlists                 list playlists
  playlist show <name>
  playlist create <name>
  playlist rename <name> = <new name>
  playlist delete <name>
  playlist play <name>
  playlist add <track> <name>
  playlist rm <track> <name>
Other:
  help | quit";

/// Metadata field editable through `tag`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagField {
    Title,
    Artist,
    Album,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlaylistCommand {
    Show(String),
    Create(String),
    Rename { name: String, new_name: String },
    Delete(String),
    Play(String),
    Add { track: String, name: String },
    Remove { track: String, name: String },
}

/// A parsed shell command
///
/// Track references are kept raw: a 1-based library number or a track ID.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Play(String),
    Pause,
    Resume,
    Next,
    Previous,
    Seek(f64),
    Volume(f32),
    Mute,
    Shuffle,
    Repeat,
    Status,
    Queue,
    Enqueue(String),
    PlayNext(String),
    Dequeue(usize),
    ClearQueue,
    List,
    Search(String),
    Tag {
        track: String,
        field: TagField,
        value: String,
    },
    Remove(String),
    Clear,
    Playlists,
    Playlist(PlaylistCommand),
    Help,
    Quit,
}

/// What the shell loop should do after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Print(String),
    Quit,
}

/// Parse one input line; `Ok(None)` for blank lines and `#` comments
pub fn parse(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (word, rest) = split_word(line);
    let command = match word.to_lowercase().as_str() {
        "play" | "p" => Command::Play(required(rest, "play <track>")?),
        "pause" => Command::Pause,
        "resume" => Command::Resume,
        "next" | "n" => Command::Next,
        "prev" | "previous" => Command::Previous,
        "seek" => Command::Seek(number(rest, "seek <seconds>")?),
        "vol" | "volume" => Command::Volume(number(rest, "vol <0.0-1.0>")?),
        "mute" => Command::Mute,
        "shuffle" => Command::Shuffle,
        "repeat" => Command::Repeat,
        "status" | "s" => Command::Status,
        "queue" | "q" => Command::Queue,
        "enqueue" => Command::Enqueue(required(rest, "enqueue <track>")?),
        "playnext" => Command::PlayNext(required(rest, "playnext <track>")?),
        "dequeue" => {
            let n: usize = number(rest, "dequeue <n>")?;
            if n == 0 {
                return Err(CliError::Usage("queue entries start at 1".to_string()));
            }
            Command::Dequeue(n)
        }
        "clearqueue" => Command::ClearQueue,
        "list" | "ls" => Command::List,
        "search" => Command::Search(required(rest, "search <text>")?),
        "tag" => parse_tag(rest)?,
        "remove" | "rm" => Command::Remove(required(rest, "remove <track>")?),
        "clear" => Command::Clear,
        "playlists" => Command::Playlists,
        "playlist" | "pl" => Command::Playlist(parse_playlist(rest)?),
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => {
            return Err(CliError::Usage(format!(
                "unknown command '{other}' (try 'help')"
            )))
        }
    };

    Ok(Some(command))
}

fn parse_tag(rest: &str) -> Result<Command> {
    const USAGE: &str = "tag <track> <title|artist|album> <value>";
    let (track, rest) = split_word(rest);
    let (field, value) = split_word(rest);
    let field = match field.to_lowercase().as_str() {
        "title" => TagField::Title,
        "artist" => TagField::Artist,
        "album" => TagField::Album,
        _ => return Err(usage(USAGE)),
    };

    Ok(Command::Tag {
        track: required(track, USAGE)?,
        field,
        value: required(value, USAGE)?,
    })
}

fn parse_playlist(rest: &str) -> Result<PlaylistCommand> {
    let (sub, rest) = split_word(rest);
    let command = match sub.to_lowercase().as_str() {
        "show" => PlaylistCommand::Show(required(rest, "playlist show <name>")?),
        "create" | "new" => PlaylistCommand::Create(required(rest, "playlist create <name>")?),
        "rename" => {
            const USAGE: &str = "playlist rename <name> = <new name>";
            let (name, new_name) = rest.split_once('=').ok_or_else(|| usage(USAGE))?;
            PlaylistCommand::Rename {
                name: required(name, USAGE)?,
                new_name: required(new_name, USAGE)?,
            }
        }
        "delete" | "del" => PlaylistCommand::Delete(required(rest, "playlist delete <name>")?),
        "play" => PlaylistCommand::Play(required(rest, "playlist play <name>")?),
        "add" => {
            let (track, name) = split_word(rest);
            PlaylistCommand::Add {
                track: required(track, "playlist add <track> <name>")?,
                name: required(name, "playlist add <track> <name>")?,
            }
        }
        "rm" | "remove" => {
            let (track, name) = split_word(rest);
            PlaylistCommand::Remove {
                track: required(track, "playlist rm <track> <name>")?,
                name: required(name, "playlist rm <track> <name>")?,
            }
        }
        _ => return Err(usage("playlist show|create|rename|delete|play|add|rm ...")),
    };
    Ok(command)
}

fn split_word(input: &str) -> (&str, &str) {
    let input = input.trim();
    match input.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (input, ""),
    }
}

fn required(value: &str, usage_text: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(usage(usage_text));
    }
    Ok(value.to_string())
}

fn number<T: std::str::FromStr>(value: &str, usage_text: &str) -> Result<T> {
    value.trim().parse().map_err(|_| usage(usage_text))
}

fn usage(text: &str) -> CliError {
    CliError::Usage(format!("usage: {text}"))
}

/// Whether the error was already announced through a `PlaybackEvent::Error`
pub fn is_notified(err: &CliError) -> bool {
    matches!(
        err,
        CliError::Service(ServiceError::Playback(PlaybackError::LoadFailed { .. }))
            | CliError::Playback(PlaybackError::LoadFailed { .. })
    )
}

// ===== Execution =====

/// Run one command
pub async fn execute(service: &MusicService, command: Command) -> Result<Outcome> {
    let text = match command {
        Command::Play(track) => {
            let id = resolve_track(service, &track).await?;
            service.play_track(&id).await?;
            now_playing(&service.snapshot().await)
        }
        Command::Pause => {
            service.pause_track().await?;
            state_line(&service.snapshot().await)
        }
        Command::Resume => {
            service.resume_track().await?;
            state_line(&service.snapshot().await)
        }
        Command::Next => {
            service.next_track().await?;
            now_playing(&service.snapshot().await)
        }
        Command::Previous => {
            service.previous_track().await?;
            now_playing(&service.snapshot().await)
        }
        Command::Seek(seconds) => {
            service.seek_to(seconds).await?;
            state_line(&service.snapshot().await)
        }
        Command::Volume(level) => {
            let stored = service.set_volume(level).await?;
            format!("Volume {}%", (stored * 100.0).round())
        }
        Command::Mute => {
            if service.toggle_mute().await? {
                "Muted".to_string()
            } else {
                "Unmuted".to_string()
            }
        }
        Command::Shuffle => {
            let enabled = service.toggle_shuffle().await;
            format!("Shuffle {}", on_off(enabled))
        }
        Command::Repeat => format!("Repeat {}", service.toggle_repeat().await),
        Command::Status => status(&service.snapshot().await),
        Command::Queue => queue_listing(&service.snapshot().await),
        Command::Enqueue(track) => {
            let id = resolve_track(service, &track).await?;
            service.add_to_queue(&id).await?;
            queue_summary(&service.snapshot().await)
        }
        Command::PlayNext(track) => {
            let id = resolve_track(service, &track).await?;
            service.play_next(&id).await?;
            queue_summary(&service.snapshot().await)
        }
        Command::Dequeue(n) => match service.remove_from_queue(n - 1).await {
            Some(track) => format!("Removed {} from the queue", describe(&track)),
            None => format!("No queue entry {n}"),
        },
        Command::ClearQueue => {
            service.clear_queue().await;
            "Queue cleared".to_string()
        }
        Command::List => {
            let tracks = service.tracks().await;
            track_listing(&tracks, "Library is empty")
        }
        Command::Search(query) => {
            let tracks = service.search(&query).await;
            track_listing(&tracks, "No matches")
        }
        Command::Tag {
            track,
            field,
            value,
        } => {
            let id = resolve_track(service, &track).await?;
            let mut update = UpdateTrack::default();
            match field {
                TagField::Title => update.title = Some(value),
                TagField::Artist => update.artist = Some(value),
                TagField::Album => update.album = Some(value),
            }
            let updated = service.update_track(&id, update).await?;
            format!("Updated {}", describe(&updated))
        }
        Command::Remove(track) => {
            let id = resolve_track(service, &track).await?;
            match service.remove_track(&id).await? {
                Some(removed) => format!("Removed {}", describe(&removed)),
                None => format!("No track {id}"),
            }
        }
        Command::Clear => {
            service.clear_tracks().await?;
            "Library cleared".to_string()
        }
        Command::Playlists => playlist_listing(&service.playlists().await),
        Command::Playlist(command) => execute_playlist(service, command).await?,
        Command::Help => HELP.to_string(),
        Command::Quit => return Ok(Outcome::Quit),
    };

    Ok(Outcome::Print(text))
}

async fn execute_playlist(service: &MusicService, command: PlaylistCommand) -> Result<String> {
    let text = match command {
        PlaylistCommand::Show(name) => {
            let playlist = resolve_playlist(service, &name).await?;
            let tracks = service.playlist_tracks(&playlist.id).await?;
            let mut out = format!("{} ({} tracks)\n", playlist.name, tracks.len());
            out.push_str(&track_listing(&tracks, "  (empty)"));
            out
        }
        PlaylistCommand::Create(name) => {
            let playlist = service.create_playlist(&name, Vec::new()).await?;
            format!("Created playlist {}", playlist.name)
        }
        PlaylistCommand::Rename { name, new_name } => {
            let playlist = resolve_playlist(service, &name).await?;
            service.rename_playlist(&playlist.id, &new_name).await?;
            format!("Renamed {} to {}", playlist.name, new_name.trim())
        }
        PlaylistCommand::Delete(name) => {
            let playlist = resolve_playlist(service, &name).await?;
            let deleted = service.delete_playlist(&playlist.id).await?;
            format!("Deleted playlist {}", deleted.name)
        }
        PlaylistCommand::Play(name) => {
            let playlist = resolve_playlist(service, &name).await?;
            service.play_playlist(&playlist.id, 0).await?;
            now_playing(&service.snapshot().await)
        }
        PlaylistCommand::Add { track, name } => {
            let id = resolve_track(service, &track).await?;
            let playlist = resolve_playlist(service, &name).await?;
            service.add_track_to_playlist(&playlist.id, id).await?;
            format!("Added to {}", playlist.name)
        }
        PlaylistCommand::Remove { track, name } => {
            let id = resolve_track(service, &track).await?;
            let playlist = resolve_playlist(service, &name).await?;
            let removed = service.remove_track_from_playlist(&playlist.id, &id).await?;
            format!("Removed {removed} entries from {}", playlist.name)
        }
    };
    Ok(text)
}

/// Library number (1-based) or track ID
async fn resolve_track(service: &MusicService, reference: &str) -> Result<TrackId> {
    let tracks = service.tracks().await;
    if let Ok(n) = reference.parse::<usize>() {
        return n
            .checked_sub(1)
            .and_then(|index| tracks.get(index))
            .map(|track| track.id.clone())
            .ok_or_else(|| CliError::Usage(format!("no track number {n}")));
    }
    Ok(TrackId::new(reference))
}

/// Playlist name first, then ID
async fn resolve_playlist(service: &MusicService, reference: &str) -> Result<Playlist> {
    if let Some(playlist) = service.find_playlist(reference).await {
        return Ok(playlist);
    }
    let id = PlaylistId::new(reference.trim());
    service
        .playlists()
        .await
        .into_iter()
        .find(|playlist| playlist.id == id)
        .ok_or_else(|| ServiceError::PlaylistNotFound(id).into())
}

// ===== Formatting =====

fn describe(track: &Track) -> String {
    format!("{} - {}", track.title, track.artist)
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}

pub fn format_time(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

fn state_name(state: PlaybackState) -> &'static str {
    match state {
        PlaybackState::Idle => "stopped",
        PlaybackState::Paused => "paused",
        PlaybackState::Playing => "playing",
    }
}

fn now_playing(snapshot: &TransportSnapshot) -> String {
    match &snapshot.current_track {
        Some(track) if snapshot.is_playing() => format!("Now playing {}", describe(track)),
        Some(track) => format!("{} ({})", describe(track), state_name(snapshot.state)),
        None => "Nothing playing".to_string(),
    }
}

fn state_line(snapshot: &TransportSnapshot) -> String {
    format!(
        "{} {} / {}",
        state_name(snapshot.state),
        format_time(snapshot.position),
        format_time(snapshot.duration)
    )
}

fn status(snapshot: &TransportSnapshot) -> String {
    let mut out = now_playing(snapshot);
    if snapshot.state.is_loaded() {
        let _ = write!(out, "\n{}", state_line(snapshot));
    }
    let _ = write!(
        out,
        "\nvolume {}%{}  shuffle {}  repeat {}",
        (snapshot.volume * 100.0).round(),
        if snapshot.muted { " (muted)" } else { "" },
        on_off(snapshot.shuffle),
        snapshot.repeat
    );
    if !snapshot.queue.is_empty() {
        let _ = write!(out, "\n{}", queue_summary(snapshot));
    }
    out
}

fn queue_summary(snapshot: &TransportSnapshot) -> String {
    format!(
        "Queue: {} tracks, at {}",
        snapshot.queue.len(),
        snapshot.queue_position + 1
    )
}

fn queue_listing(snapshot: &TransportSnapshot) -> String {
    if snapshot.queue.is_empty() {
        return "Queue is empty".to_string();
    }
    let mut out = String::new();
    for (index, track) in snapshot.queue.iter().enumerate() {
        let marker = if index == snapshot.queue_position { '>' } else { ' ' };
        let _ = writeln!(out, "{marker}{:>3}. {}", index + 1, describe(track));
    }
    out.trim_end().to_string()
}

fn track_listing(tracks: &[Track], empty: &str) -> String {
    if tracks.is_empty() {
        return empty.to_string();
    }
    let mut out = String::new();
    for (index, track) in tracks.iter().enumerate() {
        let _ = write!(out, "{:>4}. {}", index + 1, describe(track));
        if let Some(album) = &track.album {
            let _ = write!(out, " [{album}]");
        }
        if let Some(duration) = track.duration() {
            let _ = write!(out, " {}", format_time(duration));
        }
        out.push('\n');
    }
    out.trim_end().to_string()
}

fn playlist_listing(playlists: &[Playlist]) -> String {
    if playlists.is_empty() {
        return "No playlists".to_string();
    }
    playlists
        .iter()
        .map(|playlist| format!("{} ({} tracks)", playlist.name, playlist.track_ids.len()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(line: &str) -> Command {
        parse(line).unwrap().unwrap()
    }

    #[test]
    fn blank_lines_and_comments_are_skipped() {
        assert!(parse("").unwrap().is_none());
        assert!(parse("   ").unwrap().is_none());
        assert!(parse("# a comment").unwrap().is_none());
    }

    #[test]
    fn simple_commands() {
        assert_eq!(parsed("pause"), Command::Pause);
        assert_eq!(parsed("NEXT"), Command::Next);
        assert_eq!(parsed("prev"), Command::Previous);
        assert_eq!(parsed("quit"), Command::Quit);
        assert_eq!(parsed("exit"), Command::Quit);
    }

    #[test]
    fn commands_with_arguments() {
        assert_eq!(parsed("play 3"), Command::Play("3".to_string()));
        assert_eq!(parsed("seek 42.5"), Command::Seek(42.5));
        assert_eq!(parsed("vol 0.25"), Command::Volume(0.25));
        assert_eq!(parsed("dequeue 2"), Command::Dequeue(2));
        assert_eq!(
            parsed("search  miles davis "),
            Command::Search("miles davis".to_string())
        );
    }

    #[test]
    fn tag_keeps_multi_word_values() {
        assert_eq!(
            parsed("tag 1 title So What"),
            Command::Tag {
                track: "1".to_string(),
                field: TagField::Title,
                value: "So What".to_string(),
            }
        );
        assert!(parse("tag 1 genre Jazz").is_err());
    }

    #[test]
    fn playlist_subcommands() {
        assert_eq!(
            parsed("playlist create Late Night"),
            Command::Playlist(PlaylistCommand::Create("Late Night".to_string()))
        );
        assert_eq!(
            parsed("playlist add 4 Late Night"),
            Command::Playlist(PlaylistCommand::Add {
                track: "4".to_string(),
                name: "Late Night".to_string(),
            })
        );
        assert_eq!(
            parsed("playlist rename Late Night = Early Morning"),
            Command::Playlist(PlaylistCommand::Rename {
                name: "Late Night".to_string(),
                new_name: "Early Morning".to_string(),
            })
        );
    }

    #[test]
    fn bad_input_is_a_usage_error() {
        assert!(matches!(parse("play"), Err(CliError::Usage(_))));
        assert!(matches!(parse("seek soon"), Err(CliError::Usage(_))));
        assert!(matches!(parse("dequeue 0"), Err(CliError::Usage(_))));
        assert!(matches!(parse("dance"), Err(CliError::Usage(_))));
        assert!(matches!(parse("playlist rename Foo"), Err(CliError::Usage(_))));
    }

    #[test]
    fn load_failures_are_already_notified() {
        let err = CliError::Service(ServiceError::Playback(PlaybackError::LoadFailed {
            title: "Song".to_string(),
            reason: "corrupt".to_string(),
        }));
        assert!(is_notified(&err));
        assert!(!is_notified(&CliError::Usage("x".to_string())));
    }

    #[test]
    fn time_formatting() {
        assert_eq!(format_time(Duration::from_secs(0)), "00:00");
        assert_eq!(format_time(Duration::from_secs(185)), "03:05");
    }
}
