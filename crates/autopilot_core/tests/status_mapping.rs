use autopilot_core::{status_label, JobStatus, Locale, UNKNOWN_PROGRESS};

#[test]
fn progress_is_fixed_per_status() {
    for status in JobStatus::PIPELINE.iter() {
        assert_eq!(status.progress(), status.progress());
        assert_eq!(JobStatus::parse(status.as_str()).progress(), status.progress());
    }
    assert_eq!(JobStatus::Analyzing.progress(), 15);
    assert_eq!(JobStatus::Done.progress(), 100);
    assert_eq!(JobStatus::Error.progress(), 0);
}

#[test]
fn progress_never_decreases_along_pipeline() {
    let values: Vec<u8> = JobStatus::PIPELINE.iter().map(JobStatus::progress).collect();
    assert!(values.windows(2).all(|pair| pair[0] <= pair[1]), "{values:?}");
    assert_eq!(values.first(), Some(&5));
    assert_eq!(values.last(), Some(&100));
}

#[test]
fn unknown_status_uses_default_progress() {
    let status = JobStatus::parse("some_unrecognized_value");
    assert_eq!(status, JobStatus::Unknown("some_unrecognized_value".to_string()));
    assert_eq!(status.progress(), UNKNOWN_PROGRESS);
    assert_eq!(JobStatus::processing().progress(), 10);
    assert!(!status.is_terminal());
}

#[test]
fn only_done_and_error_are_terminal() {
    let terminal: Vec<_> = JobStatus::PIPELINE
        .iter()
        .filter(|status| status.is_terminal())
        .cloned()
        .collect();
    assert_eq!(terminal, vec![JobStatus::Done]);
    assert!(JobStatus::Error.is_terminal());
}

#[test]
fn every_pipeline_status_round_trips_through_its_name() {
    for status in JobStatus::PIPELINE.iter() {
        assert_eq!(&JobStatus::parse(status.as_str()), status);
    }
    assert_eq!(JobStatus::parse("error"), JobStatus::Error);
}

#[test]
fn labels_are_localized_and_unknown_is_verbatim() {
    assert_eq!(
        status_label(&JobStatus::Analyzing, Locale::Ko),
        "유튜브 데이터 분석 중..."
    );
    assert_eq!(
        status_label(&JobStatus::Rendering, Locale::En),
        "Compositing and rendering the final video..."
    );
    assert_eq!(
        status_label(&JobStatus::parse("queued"), Locale::En),
        "queued"
    );
}

#[test]
fn status_deserializes_from_plain_string() {
    let status: JobStatus = serde_json::from_str("\"generating_thumbnail\"").unwrap();
    assert_eq!(status, JobStatus::GeneratingThumbnail);
    let encoded = serde_json::to_string(&JobStatus::parse("queued")).unwrap();
    assert_eq!(encoded, "\"queued\"");
}
