use std::path::PathBuf;

use autopilot_core::{
    CreationMode, JobConfig, Locale, Mode, PresetId, ProjectId, SceneCount, UploadPrivacy,
};
use clap::{Args, Parser, Subcommand};

use crate::settings::SETTINGS_FILENAME;

#[derive(Debug, Parser)]
#[command(name = "autopilot", version, about = "Launch and watch autopilot video jobs")]
pub struct Cli {
    /// Settings file (RON).
    #[arg(long, global = true, default_value = SETTINGS_FILENAME)]
    pub config: PathBuf,

    /// Backend base URL, overrides the settings file.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Message language (ko or en).
    #[arg(long, global = true)]
    pub locale: Option<Locale>,

    /// Mirror the log to the terminal.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Submit a job and follow it until it finishes.
    Launch {
        #[command(flatten)]
        job: JobArgs,

        /// Apply a saved preset before the flags above.
        #[arg(long)]
        preset: Option<PresetId>,

        #[command(flatten)]
        watch: WatchArgs,
    },
    /// Follow a job that was started earlier.
    Monitor {
        project_id: ProjectId,

        #[command(flatten)]
        watch: WatchArgs,
    },
    /// Start the batch queue and wait until it is empty.
    Batch,
    #[command(subcommand)]
    Queue(QueueCommand),
    #[command(subcommand)]
    Presets(PresetCommand),
}

#[derive(Debug, Subcommand)]
pub enum QueueCommand {
    List,
    /// Take a project out of the queue.
    Remove { project_id: ProjectId },
}

#[derive(Debug, Subcommand)]
pub enum PresetCommand {
    List,
    /// Save the job flags as a named preset.
    Save {
        name: String,

        #[command(flatten)]
        job: JobArgs,
    },
    Delete { preset_id: PresetId },
}

#[derive(Debug, Clone, Copy, Args)]
pub struct WatchArgs {
    /// Stop watching after this many seconds; the job keeps running.
    #[arg(long, value_name = "SECS")]
    pub detach_after: Option<u64>,
}

/// Job fields settable from the command line. Unset flags leave the
/// draft as it is.
#[derive(Debug, Clone, Default, Args)]
pub struct JobArgs {
    /// Topic keyword.
    #[arg(long)]
    pub topic: Option<String>,

    /// Product page for commerce jobs; implies `--creation-mode commerce`.
    #[arg(long)]
    pub product_url: Option<String>,

    #[arg(long)]
    pub mode: Option<Mode>,

    #[arg(long)]
    pub creation_mode: Option<CreationMode>,

    /// Minutes for longform, seconds for shorts.
    #[arg(long)]
    pub duration: Option<u32>,

    #[arg(long)]
    pub scene_count: Option<u32>,

    /// Animate every scene.
    #[arg(long, conflicts_with = "scene_count")]
    pub all_scenes: bool,

    #[arg(long)]
    pub image_style: Option<String>,

    #[arg(long)]
    pub thumbnail_style: Option<String>,

    #[arg(long)]
    pub motion_method: Option<String>,

    #[arg(long)]
    pub video_engine: Option<String>,

    #[arg(long)]
    pub script_style: Option<String>,

    #[arg(long)]
    pub voice_provider: Option<String>,

    #[arg(long)]
    pub voice_id: Option<String>,

    #[arg(long)]
    pub privacy: Option<UploadPrivacy>,

    /// Local datetime for scheduled uploads, e.g. 2026-10-20T09:30.
    #[arg(long)]
    pub schedule_at: Option<String>,

    #[arg(long)]
    pub channel_id: Option<u64>,
}

impl JobArgs {
    /// Mode to select first. Commerce jobs are shorts unless told otherwise.
    pub fn mode(&self) -> Option<Mode> {
        self.mode.or_else(|| {
            (self.creation_mode() == Some(CreationMode::Commerce)).then_some(Mode::Shorts)
        })
    }

    /// Creation mode to select before the remaining fields are applied.
    pub fn creation_mode(&self) -> Option<CreationMode> {
        self.creation_mode
            .or_else(|| self.product_url.as_ref().map(|_| CreationMode::Commerce))
    }

    /// Copies every set flag except the two modes onto `config`.
    pub fn apply_fields(&self, config: &mut JobConfig) {
        if let Some(topic) = &self.topic {
            config.topic = topic.clone();
        }
        if let Some(product_url) = &self.product_url {
            config.product_url = product_url.clone();
        }
        if let Some(duration) = self.duration {
            config.set_duration_from_form(Some(duration));
        }
        if self.all_scenes {
            config.scene_count = SceneCount::All;
        } else if let Some(count) = self.scene_count {
            config.scene_count = SceneCount::Fixed(count);
        }

        let strings = [
            (&self.image_style, &mut config.image_style),
            (&self.thumbnail_style, &mut config.thumbnail_style),
            (&self.motion_method, &mut config.motion_method),
            (&self.video_engine, &mut config.video_engine),
            (&self.script_style, &mut config.script_style),
            (&self.voice_provider, &mut config.voice_provider),
            (&self.voice_id, &mut config.voice_id),
        ];
        for (flag, field) in strings {
            if let Some(value) = flag {
                *field = value.clone();
            }
        }

        if let Some(privacy) = self.privacy {
            config.upload.privacy = privacy;
        }
        if let Some(schedule_at) = &self.schedule_at {
            config.upload.schedule_at = Some(schedule_at.clone());
        }
        if let Some(channel_id) = self.channel_id {
            config.upload.channel_id = Some(channel_id);
        }
    }
}
