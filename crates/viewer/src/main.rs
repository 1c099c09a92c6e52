//! Terminal animation viewer.
//!
//! Thin front-end over [`toonweave_player::Player`]: lists projects,
//! loads one into the playback engine, and maps line commands onto the
//! transport operations. Rendering is left to the remote preview
//! service; this binary only shows cursor positions and snapshot sizes.

use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use toonweave_client::{ApiConfig, StudioApi};
use toonweave_core::project::ProjectSummary;
use toonweave_player::{Player, PlayerEvent};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "toonweave_viewer=info,toonweave_player=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ApiConfig::from_env();
    tracing::info!(base_url = %config.base_url, "Loaded client configuration");

    let api = Arc::new(StudioApi::new(&config));
    let player = Player::new(Arc::clone(&api) as Arc<dyn toonweave_player::PreviewSource>);

    spawn_event_printer(&player);

    let mut projects = load_projects(&api).await;
    print_projects(&projects);

    let mut selected: Option<String> = None;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("commands: projects, open N, play, pause, next, prev, goto N, seek F,");
    println!("          mute, status, story <prompt>, narrate <text>, render, export, quit");

    while let Some(line) = lines.next_line().await.context("stdin closed")? {
        let line = line.trim();
        let (command, rest) = match line.split_once(' ') {
            Some((c, r)) => (c, r.trim()),
            None => (line, ""),
        };

        match command {
            "" => {}
            "projects" => {
                projects = load_projects(&api).await;
                print_projects(&projects);
            }
            "open" => match parse_index(rest, projects.len()) {
                Some(i) => {
                    let id = projects[i].id.clone();
                    match api.get_project(&id).await {
                        Ok(project) => {
                            println!(
                                "opened '{}' ({} scenes)",
                                project.name,
                                project.scenes.len()
                            );
                            player.select_project(&project).await;
                            selected = Some(id);
                        }
                        Err(e) => tracing::error!(error = %e, "Failed to load project"),
                    }
                }
                None => println!("usage: open N (1..{})", projects.len()),
            },
            "play" => player.play().await,
            "pause" => player.pause().await,
            "next" => player.next_scene().await,
            "prev" => player.previous_scene().await,
            "goto" => match rest.parse::<usize>() {
                Ok(n) if n >= 1 => player.select_scene(n - 1).await,
                _ => println!("usage: goto N"),
            },
            "seek" => match rest.parse::<u32>() {
                Ok(frame) => player.seek(frame).await,
                Err(_) => println!("usage: seek FRAME"),
            },
            "mute" => player.toggle_mute().await,
            "status" => print_status(&player).await,
            "story" => match &selected {
                Some(project_id) if !rest.is_empty() => {
                    match api.create_story(project_id, rest).await {
                        Ok(story) => {
                            println!("story '{}' with {} scenes", story.title, story.scenes.len());
                            // Reload so the player sees the new scenes.
                            if let Ok(project) = api.get_project(project_id).await {
                                player.select_project(&project).await;
                            }
                        }
                        Err(e) => println!("story generation failed: {e}"),
                    }
                }
                Some(_) => println!("usage: story <prompt>"),
                None => println!("open a project first"),
            },
            "narrate" => match &selected {
                Some(project_id) if !rest.is_empty() => {
                    let request = toonweave_client::api::AudioRequest {
                        project_id: project_id.clone(),
                        text: rest.to_string(),
                        track_type: toonweave_core::audio::TrackType::Narration,
                        scene_id: player.state().await.current_scene_id().map(str::to_string),
                    };
                    match api.generate_audio(&request).await {
                        Ok(audio) => println!(
                            "audio ready: {} ({:.1}s)",
                            api.audio_file_url(&audio.filename),
                            audio.duration
                        ),
                        Err(e) => println!("audio generation failed: {e}"),
                    }
                }
                Some(_) => println!("usage: narrate <text>"),
                None => println!("open a project first"),
            },
            "render" => match &selected {
                Some(project_id) => match api.render_animation(project_id).await {
                    Ok(summary) => println!(
                        "rendered {} frames at {} fps",
                        summary.total_frames, summary.frame_rate
                    ),
                    Err(e) => println!("render failed: {e}"),
                },
                None => println!("open a project first"),
            },
            "export" => match &selected {
                Some(project_id) => {
                    println!("export started, this may take a few minutes...");
                    match api.export_video(project_id).await {
                        Ok(status) if status.success => println!(
                            "export complete: {}",
                            status.video_path.unwrap_or_default()
                        ),
                        Ok(status) => println!(
                            "export failed: {}",
                            status.message.unwrap_or_else(|| "unknown error".into())
                        ),
                        Err(e) => println!("export failed: {e}"),
                    }
                }
                None => println!("open a project first"),
            },
            "quit" | "exit" => break,
            other => println!("unknown command: {other}"),
        }
    }

    player.shutdown().await;
    Ok(())
}

/// Fetch the project list; failures log and leave the list empty.
async fn load_projects(api: &StudioApi) -> Vec<ProjectSummary> {
    match api.list_projects().await {
        Ok(projects) => projects,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load projects");
            vec![]
        }
    }
}

fn print_projects(projects: &[ProjectSummary]) {
    if projects.is_empty() {
        println!("no projects");
        return;
    }
    for (i, project) in projects.iter().enumerate() {
        println!(
            "{:>3}. {} — {}",
            i + 1,
            project.name,
            project.description.as_deref().unwrap_or("")
        );
    }
}

async fn print_status(player: &Arc<Player>) {
    let state = player.state().await;
    let scene_count = state.scenes.len();
    if scene_count == 0 {
        println!("no scenes loaded");
        return;
    }
    let title = state
        .current_scene()
        .and_then(|s| s.title.clone())
        .unwrap_or_else(|| format!("Scene {}", state.scene_index + 1));
    println!(
        "{} | scene {}/{} | frame {}/{} | {}{}",
        title,
        state.scene_index + 1,
        scene_count,
        state.frame_index + 1,
        state.total_frames,
        if state.playing { "playing" } else { "paused" },
        if state.muted { " (muted)" } else { "" },
    );
    if let Some(markup) = player.preview().await {
        println!("preview: {} bytes of markup", markup.len());
    }
}

/// Parse a 1-based list index.
fn parse_index(input: &str, len: usize) -> Option<usize> {
    match input.parse::<usize>() {
        Ok(n) if n >= 1 && n <= len => Some(n - 1),
        _ => None,
    }
}

/// Print player events as they arrive, skipping per-frame noise.
fn spawn_event_printer(player: &Arc<Player>) {
    let mut events = player.subscribe();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(PlayerEvent::SceneEntered {
                    scene_index,
                    scene_id,
                }) => println!("-> scene {} ({scene_id})", scene_index + 1),
                Ok(PlayerEvent::Finished) => println!("-> playback finished"),
                Ok(PlayerEvent::PreviewFailed { scene_id, error }) => {
                    println!("-> preview for {scene_id} failed: {error}")
                }
                Ok(_) => {}
                // Lagged receivers just resubscribe to the tail.
                Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => continue,
                Err(tokio::sync::broadcast::error::RecvError::Closed) => return,
            }
        }
    });
}
