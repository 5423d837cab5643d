use std::fmt;

/// Result alias used throughout the crate.
pub type ReelResult<T> = Result<T, ReelError>;

/// Pipeline stage names used to attribute failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    /// Decoding and framing the scene image.
    SceneBuild,
    /// Decoding and attaching the narration track.
    SceneAudio,
    /// Word subtitle overlay.
    Subtitle,
    /// Blending two adjacent clips.
    Transition,
    /// Looping and mixing the background track.
    BackgroundAudio,
    /// Streaming frames into the encoder and publishing the output file.
    Encode,
}

impl Stage {
    /// Stable kebab-case name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SceneBuild => "scene-build",
            Self::SceneAudio => "scene-audio",
            Self::Subtitle => "subtitle",
            Self::Transition => "transition",
            Self::BackgroundAudio => "background-audio",
            Self::Encode => "encode",
        }
    }

    /// Whether a failure in this stage degrades the video instead of aborting the request.
    pub fn is_recoverable(self) -> bool {
        matches!(
            self,
            Self::Subtitle | Self::Transition | Self::BackgroundAudio
        )
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ReelError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("evaluation error: {0}")]
    Evaluation(String),

    #[error("media error: {0}")]
    Media(String),

    /// Fatal failure attributed to one scene (1-based) and stage.
    #[error("scene {scene} failed at stage '{stage}': {source}")]
    Scene {
        scene: usize,
        stage: Stage,
        #[source]
        source: Box<ReelError>,
    },

    /// Fatal failure of a stage that is not tied to a single scene.
    #[error("stage '{stage}' failed: {source}")]
    Stage {
        stage: Stage,
        #[source]
        source: Box<ReelError>,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReelError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    pub fn media(msg: impl Into<String>) -> Self {
        Self::Media(msg.into())
    }

    pub fn in_scene(self, scene: usize, stage: Stage) -> Self {
        Self::Scene {
            scene,
            stage,
            source: Box::new(self),
        }
    }

    pub fn in_stage(self, stage: Stage) -> Self {
        Self::Stage {
            stage,
            source: Box::new(self),
        }
    }

    /// 1-based scene number, when the failure is attributed to a scene.
    pub fn scene(&self) -> Option<usize> {
        match self {
            Self::Scene { scene, .. } => Some(*scene),
            _ => None,
        }
    }

    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Scene { stage, .. } | Self::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
