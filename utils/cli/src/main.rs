use std::{path::PathBuf, time::Duration};

use anyhow::{bail, Context as _};
use clap::{CommandFactory, Parser, Subcommand};
use lumipet_app::{
    core::{AnimationData, AnimationId, AnimationRecord, Fps, Grid},
    network::{import_from_video_frames, Bus, DeviceSync, MemoryBus, DEFAULT_THRESHOLD},
    storage::{AnimationStore, FileBlobStore},
    Editor,
};
use lumipet_cli::{
    describe_messages, dry_run_bus, pixelate_image, render_grid, Configuration,
};

/// LumiPet animations utility
///
/// A command line application for managing the LumiPet 8x8 animations and sending
/// them to the device.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = false)]
struct Cli {
    /// Configuration file
    #[arg(short, long, default_value = "lumipet.json", value_name = "FILE")]
    config: PathBuf,
    /// Animations store directory, overrides the configuration
    #[arg(short, long, value_name = "DIR")]
    store: Option<PathBuf>,
    /// Device bus broker address, overrides the configuration
    #[arg(short, long, value_name = "URL")]
    broker: Option<String>,
    /// Actual command
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List stored animations
    List,
    /// Show the stored animation frames
    Show {
        /// Animation identifier
        id: AnimationId,
    },
    /// Create a new animation
    Create {
        /// Animation name
        name: String,
        /// Animation frame rate
        #[arg(short, long, default_value_t = Fps::DEFAULT)]
        fps: Fps,
        /// Frame patterns, a single empty frame if not specified
        #[arg(short, long = "pattern", value_name = "PATTERN")]
        patterns: Vec<Grid>,
    },
    /// Rename the stored animation
    Rename {
        /// Animation identifier
        id: AnimationId,
        /// New animation name
        name: String,
    },
    /// Delete the stored animation
    Delete {
        /// Animation identifier
        id: AnimationId,
    },
    /// Move the stored animation to another position
    Move { from: usize, to: usize },
    /// Import an animation from the sequence of images
    Import {
        /// Frame images
        #[arg(value_name = "FILE", required = true)]
        images: Vec<PathBuf>,
        /// Animation name
        #[arg(short, long)]
        name: String,
        /// Pixels brighter than this threshold are turned on
        #[arg(short, long, default_value_t = DEFAULT_THRESHOLD)]
        threshold: u8,
        /// Animation frame rate
        #[arg(short, long, default_value_t = Fps::DEFAULT)]
        fps: Fps,
    },
    /// Play the stored animation in the terminal
    Play {
        /// Animation identifier
        id: AnimationId,
        /// Playback duration
        #[arg(short, long, default_value = "5", value_name = "SECONDS")]
        seconds: u64,
    },
    /// Show a single pattern on the device
    SendPattern {
        /// Pattern rows, like `00000000,00011000,...`
        pattern: Grid,
    },
    /// Upload the stored animation to the device
    Send {
        /// Animation identifier
        id: AnimationId,
    },
    /// Upload the stored animation to the device and play it
    Run {
        /// Animation identifier
        id: AnimationId,
    },
    /// Generate shell completions
    Completions {
        /// The shell to generate the completions for
        #[arg(value_enum)]
        shell: clap_complete_command::Shell,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let mut config = Configuration::load(&cli.config)?;
    if let Some(store_dir) = cli.store {
        config.store_dir = store_dir;
    }
    if let Some(broker_url) = cli.broker {
        config.bus.broker_url = broker_url;
    }

    match cli.command {
        Command::List => {
            for (index, record) in open_store(&config)?.list()?.iter().enumerate() {
                println!(
                    "{index:>3}  {}  {:<24} {:>3} frames @ {} fps",
                    record.id,
                    record.name,
                    record.data.len(),
                    record.data.fps,
                );
            }
        }
        Command::Show { id } => {
            let record = find_record(&open_store(&config)?, &id)?;
            println!(
                "{} ({}), created at {}, {} fps, loop: {}",
                record.name, record.id, record.created_at, record.data.fps, record.data.looped
            );
            for (index, frame) in record.data.frames().iter().enumerate() {
                println!("#{index} {frame}\n{}", render_grid(frame));
            }
        }
        Command::Create {
            name,
            fps,
            patterns,
        } => {
            let frames = if patterns.is_empty() {
                vec![Grid::empty()]
            } else {
                patterns
            };
            let record = open_store(&config)?.create(&name, AnimationData::new(fps, frames)?)?;
            println!("{}", record.id);
        }
        Command::Rename { id, name } => {
            if !open_store(&config)?.rename(&id, &name)? {
                bail!("There is no animation with id {id}");
            }
        }
        Command::Delete { id } => {
            if !open_store(&config)?.delete(&id)? {
                bail!("There is no animation with id {id}");
            }
        }
        Command::Move { from, to } => open_store(&config)?.move_item(from, to)?,
        Command::Import {
            images,
            name,
            threshold,
            fps,
        } => {
            let frames = images
                .iter()
                .map(pixelate_image)
                .collect::<anyhow::Result<Vec<_>>>()?;

            let mut data = import_from_video_frames(frames, threshold)?;
            data.fps = fps;
            let record = open_store(&config)?.create(&name, data)?;
            log::info!("Imported {} frames as {}", images.len(), record.id);
            println!("{}", record.id);
        }
        Command::Play { id, seconds } => {
            let record = find_record(&open_store(&config)?, &id)?;
            play(record, Duration::from_secs(seconds)).await?;
        }
        Command::SendPattern { pattern } => {
            publish(&config, |sync| sync.publish_single_pattern(&pattern))?;
        }
        Command::Send { id } => {
            let editor = Editor::open(find_record(&open_store(&config)?, &id)?)?;
            publish(&config, |sync| editor.send_animation(sync))?;
        }
        Command::Run { id } => {
            let editor = Editor::open(find_record(&open_store(&config)?, &id)?)?;
            publish(&config, |sync| editor.preview(sync))?;
        }
        Command::Completions { shell } => {
            shell.generate(&mut Cli::command(), &mut std::io::stdout());
        }
    }

    Ok(())
}

fn open_store(config: &Configuration) -> anyhow::Result<AnimationStore<FileBlobStore>> {
    let backend = FileBlobStore::open(&config.store_dir)
        .with_context(|| format!("Unable to open the store in {:?}", config.store_dir))?;
    Ok(AnimationStore::new(backend))
}

fn find_record(
    store: &AnimationStore<FileBlobStore>,
    id: &AnimationId,
) -> anyhow::Result<AnimationRecord> {
    store
        .get(id)?
        .with_context(|| format!("There is no animation with id {id}"))
}

fn publish<F>(config: &Configuration, send: F) -> anyhow::Result<()>
where
    F: FnOnce(&mut DeviceSync<MemoryBus>) -> lumipet_app::LumipetResult<()>,
{
    let mut bus = dry_run_bus(&config.bus);
    bus.connect().map_err(anyhow::Error::msg)?;

    let mut sync = DeviceSync::with_channels(bus, config.bus.channels.clone());
    send(&mut sync)?;

    let mut bus = sync.into_inner();
    print!("{}", describe_messages(&bus.take_published()));
    bus.disconnect();
    Ok(())
}

async fn play(record: AnimationRecord, duration: Duration) -> anyhow::Result<()> {
    let mut editor = Editor::open(record)?;
    let mut index = editor.playback().subscribe();

    let fps = editor.fps();
    editor.playback_mut().play(fps).await;

    let playback = editor.playback();
    let ticks = async {
        loop {
            println!(
                "#{}\n{}",
                playback.display_index(),
                render_grid(&playback.display_frame())
            );
            if index.changed().await.is_err() {
                break;
            }
        }
    };
    // The index channel lives as long as the playback, so the loop ends only by timeout.
    let _ = tokio::time::timeout(duration, ticks).await;

    editor.playback_mut().stop().await;
    Ok(())
}
