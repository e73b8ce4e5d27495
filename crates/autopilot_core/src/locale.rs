use std::borrow::Cow;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::JobStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Ko,
    En,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "ko" | "kr" | "korean" => Ok(Locale::Ko),
            "en" | "english" => Ok(Locale::En),
            other => Err(format!("unsupported locale '{other}'")),
        }
    }
}

/// Fixed user-facing strings that are not status labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Text {
    MissingTopic,
    MissingProductUrl,
    MissingPresetName,
    PreparingJob,
    JobFinished,
    JobFailed,
    MonitorDetached,
    QueueEmpty,
    BatchStarted,
    BatchFinished,
    Dequeued,
    PresetSaved,
    PresetDeleted,
    PresetMissing,
}

pub fn text(key: Text, locale: Locale) -> &'static str {
    match locale {
        Locale::Ko => match key {
            Text::MissingTopic => "주제 키워드를 입력해주세요.",
            Text::MissingProductUrl => "상품 URL을 입력해주세요.",
            Text::MissingPresetName => "프리셋 이름을 입력해주세요.",
            Text::PreparingJob => "작업 시작 준비 중...",
            Text::JobFinished => "제작이 완료되었습니다! 잠시 후 이동합니다.",
            Text::JobFailed => "제작 중 오류가 발생했습니다. 로그를 확인하세요.",
            Text::MonitorDetached => "작업이 백그라운드에서 계속 진행됩니다.",
            Text::QueueEmpty => "대기 중인 프로젝트가 없습니다.",
            Text::BatchStarted => "일괄 처리 작업이 시작되었습니다.",
            Text::BatchFinished => "모든 작업이 완료되었습니다!",
            Text::Dequeued => "대기열에서 제거되었습니다.",
            Text::PresetSaved => "프리셋이 저장되었습니다!",
            Text::PresetDeleted => "프리셋이 삭제되었습니다.",
            Text::PresetMissing => "프리셋을 찾을 수 없습니다.",
        },
        Locale::En => match key {
            Text::MissingTopic => "Please enter a topic keyword.",
            Text::MissingProductUrl => "Please enter a product URL.",
            Text::MissingPresetName => "Please enter a preset name.",
            Text::PreparingJob => "Preparing to start...",
            Text::JobFinished => "Production finished. Redirecting shortly.",
            Text::JobFailed => "Production failed. Check the logs.",
            Text::MonitorDetached => "The job keeps running in the background.",
            Text::QueueEmpty => "No projects are waiting in the queue.",
            Text::BatchStarted => "Batch processing started.",
            Text::BatchFinished => "All queued jobs are finished!",
            Text::Dequeued => "Removed from the queue.",
            Text::PresetSaved => "Preset saved.",
            Text::PresetDeleted => "Preset deleted.",
            Text::PresetMissing => "Preset not found.",
        },
    }
}

/// Human-readable label for a status. Statuses outside the pipeline are
/// shown verbatim.
pub fn status_label(status: &JobStatus, locale: Locale) -> Cow<'static, str> {
    let label = match locale {
        Locale::Ko => match status {
            JobStatus::Created => "워크플로우 초기화 중...",
            JobStatus::Analyzing => "유튜브 데이터 분석 중...",
            JobStatus::Analyzed => "데이터 분석 완료",
            JobStatus::Planning => "대본 기획 구성 중...",
            JobStatus::Planned => "기획안 확정 완료",
            JobStatus::Scripting => "AI 대본 작성 중...",
            JobStatus::Scripted => "대본 초안 완성",
            JobStatus::GeneratingAssets => "AI 비주얼 에셋 생성 중 (이미지/영상)...",
            JobStatus::GeneratingThumbnail => "맞춤형 썸네일 제작 중...",
            JobStatus::Rendering => "최종 영상 합성 및 렌더링 중...",
            JobStatus::Done => "모든 제작이 완료되었습니다!",
            JobStatus::Error => "처리 중 오류가 발생했습니다.",
            JobStatus::Unknown(raw) => return Cow::Owned(raw.clone()),
        },
        Locale::En => match status {
            JobStatus::Created => "Initializing workflow...",
            JobStatus::Analyzing => "Analyzing YouTube data...",
            JobStatus::Analyzed => "Analysis complete",
            JobStatus::Planning => "Planning the script...",
            JobStatus::Planned => "Plan confirmed",
            JobStatus::Scripting => "Writing the script...",
            JobStatus::Scripted => "Script draft ready",
            JobStatus::GeneratingAssets => "Generating visual assets (images/video)...",
            JobStatus::GeneratingThumbnail => "Creating the thumbnail...",
            JobStatus::Rendering => "Compositing and rendering the final video...",
            JobStatus::Done => "All production steps are complete!",
            JobStatus::Error => "An error occurred while processing.",
            JobStatus::Unknown(raw) => return Cow::Owned(raw.clone()),
        },
    };
    Cow::Borrowed(label)
}
