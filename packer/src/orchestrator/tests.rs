use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::thread::{self, ThreadId};

use super::*;
use crate::common::test_utils::*;
use crate::precision::PrecisionMode;

#[derive(Default)]
struct MockHost {
    sources: HashMap<&'static str, Result<SourceImage, ChannelError>>,
    fail_create: bool,
    cancel_on: Option<(PackStage, CancelToken)>,
    load_threads: RefCell<Vec<ThreadId>>,
    stages: RefCell<Vec<PackStage>>,
    created: RefCell<Vec<AssetHandle>>,
    discarded: RefCell<Vec<AssetHandle>>,
    notifications: RefCell<Vec<(String, Outcome)>>,
    next_id: Cell<u64>,
}

impl MockHost {
    fn with_source(mut self, handle: &'static str, source: SourceImage) -> Self {
        self.sources.insert(handle, Ok(source));
        self
    }

    fn with_failing_source(mut self, handle: &'static str, cause: ChannelError) -> Self {
        self.sources.insert(handle, Err(cause));
        self
    }

    fn cancelling_on(mut self, stage: PackStage, token: &CancelToken) -> Self {
        self.cancel_on = Some((stage, token.clone()));
        self
    }

    fn live_assets(&self) -> Vec<AssetHandle> {
        let discarded = self.discarded.borrow();
        self.created
            .borrow()
            .iter()
            .filter(|asset| !discarded.contains(asset))
            .cloned()
            .collect()
    }

    fn last_notification(&self) -> (String, Outcome) {
        self.notifications.borrow().last().cloned().unwrap()
    }
}

impl PackHost for MockHost {
    type SourceHandle = &'static str;

    fn load_source_image(&self, handle: &&'static str) -> Result<SourceImage, ChannelError> {
        self.load_threads.borrow_mut().push(thread::current().id());
        self.sources[handle].clone()
    }

    fn create_output_asset(
        &self,
        path: &str,
        _image: &PackedImage,
        _compression: CompressionIntent,
    ) -> Result<AssetHandle, HostError> {
        if self.fail_create {
            return Err(HostError {
                path: path.to_string(),
                reason: "package is read-only".to_string(),
            });
        }
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        self.created.borrow_mut().push(AssetHandle(id));
        Ok(AssetHandle(id))
    }

    fn discard_output_asset(&self, asset: AssetHandle) {
        self.discarded.borrow_mut().push(asset);
    }

    fn report_progress(&self, stage: PackStage) {
        self.stages.borrow_mut().push(stage);
        if let Some((cancel_stage, token)) = &self.cancel_on {
            if *cancel_stage == stage {
                token.cancel();
            }
        }
    }

    fn notify(&self, message: &str, outcome: Outcome) {
        self.notifications
            .borrow_mut()
            .push((message.to_string(), outcome));
    }
}

fn basic_host() -> MockHost {
    MockHost::default()
        .with_source("rough", gray8_solid("T_Rough", 16, 16, 90))
        .with_source("metal", float32_gray_solid("T_Metal", 8, 8, 0.75))
}

fn basic_job() -> PackJob<&'static str> {
    PackJob::new("/Game/T_Packed", 16)
        .with_source(ChannelSlot::R, "rough")
        .with_source(ChannelSlot::B, "metal")
        .with_compression(CompressionIntent::Masks)
}

#[test]
fn successful_job_walks_every_stage() {
    let host = basic_host();
    let output = basic_job().run(&host, &CancelToken::new()).unwrap();

    assert_eq!(
        *host.stages.borrow(),
        vec![
            PackStage::Extracting,
            PackStage::Processing,
            PackStage::Joining,
            PackStage::Interleaving,
            PackStage::Finalizing,
            PackStage::Done,
        ]
    );
    assert_eq!(host.live_assets(), vec![output.asset.clone()]);
    assert_eq!(output.image.mode(), PrecisionMode::HighPrecision);
    assert_eq!(output.image.compression(), CompressionIntent::Masks);
    assert_eq!((output.image.width(), output.image.height()), (16, 16));

    let (message, outcome) = host.last_notification();
    assert_eq!(outcome, Outcome::Success);
    assert!(message.contains("/Game/T_Packed"), "{message}");
}

#[test]
fn sources_are_captured_on_calling_thread() {
    let host = basic_host();
    basic_job().run(&host, &CancelToken::new()).unwrap();

    let threads = host.load_threads.borrow();
    assert_eq!(threads.len(), 2);
    assert!(threads.iter().all(|id| *id == thread::current().id()));
}

#[test]
fn cancellation_before_start_does_no_work() {
    let host = basic_host();
    let token = CancelToken::new();
    token.cancel();

    let err = basic_job().run(&host, &token).unwrap_err();

    assert_eq!(
        err,
        PackError::Cancelled {
            stage: PackStage::Idle
        }
    );
    assert!(host.load_threads.borrow().is_empty());
    assert!(host.created.borrow().is_empty());
    assert_eq!(host.last_notification().1, Outcome::Failure);
}

#[test]
fn cancellation_at_each_checkpoint_leaves_no_asset() {
    let cases = [
        (PackStage::Extracting, PackStage::Extracting),
        (PackStage::Processing, PackStage::Joining),
        (PackStage::Joining, PackStage::Joining),
        (PackStage::Interleaving, PackStage::Finalizing),
        (PackStage::Finalizing, PackStage::Finalizing),
    ];

    for (cancel_during, observed_at) in cases {
        let token = CancelToken::new();
        let host = basic_host().cancelling_on(cancel_during, &token);

        let err = basic_job().run(&host, &token).unwrap_err();

        assert_eq!(
            err,
            PackError::Cancelled { stage: observed_at },
            "cancel during {cancel_during:?}"
        );
        assert!(host.live_assets().is_empty(), "cancel during {cancel_during:?}");
        assert_eq!(host.stages.borrow().last(), Some(&PackStage::Cancelled));
        assert_eq!(host.last_notification().1, Outcome::Failure);
    }
}

#[test]
fn late_cancellation_discards_created_asset() {
    let token = CancelToken::new();
    let host = basic_host().cancelling_on(PackStage::Finalizing, &token);

    basic_job().run(&host, &token).unwrap_err();

    assert_eq!(host.created.borrow().len(), 1);
    assert_eq!(*host.discarded.borrow(), *host.created.borrow());
}

#[test]
fn lock_failure_degrades_slot() {
    let host = basic_host().with_failing_source(
        "locked",
        ChannelError::LockFailed {
            source_name: "T_Locked".to_string(),
            reason: "source data unavailable".to_string(),
        },
    );
    let job = basic_job().with_source(ChannelSlot::A, "locked");

    let output = job.run(&host, &CancelToken::new()).unwrap();

    assert_eq!(output.warnings.len(), 1);
    assert_eq!(output.warnings[0].slot, ChannelSlot::A);
    assert_eq!(output.warnings[0].source_name, "T_Locked");
    assert!(output
        .image
        .channel(ChannelSlot::A)
        .samples()
        .as_f16()
        .unwrap()
        .iter()
        .all(|v| *v == half::f16::ONE));

    let (message, outcome) = host.last_notification();
    assert_eq!(outcome, Outcome::Success);
    assert!(message.contains("T_Locked"), "{message}");
}

#[test]
fn invalid_job_is_rejected_before_capture() {
    let cases = [
        (
            PackJob::new("/Game/T_Empty", 16),
            ValidationError::NoInputs,
        ),
        (
            PackJob::new("", 16).with_source(ChannelSlot::R, "rough"),
            ValidationError::EmptyOutputName,
        ),
        (
            PackJob::new("/Game/T_Huge", 9000).with_source(ChannelSlot::R, "rough"),
            ValidationError::ResolutionOutOfRange(9000),
        ),
    ];

    for (job, expected) in cases {
        let host = basic_host();
        let err = job.run(&host, &CancelToken::new()).unwrap_err();

        assert_eq!(err, PackError::Validation(expected));
        assert!(host.load_threads.borrow().is_empty());
        assert!(host.stages.borrow().is_empty());
        assert_eq!(host.last_notification().1, Outcome::Failure);
    }
}

#[test]
fn invalid_config_is_reported_not_panicked() {
    let config: PackConfig = serde_json::from_str(r#"{ "max_concurrent_channels": 0 }"#).unwrap();
    let host = basic_host();

    let err = basic_job().with_config(config).run(&host, &CancelToken::new()).unwrap_err();

    assert!(matches!(
        err,
        PackError::Validation(ValidationError::InvalidConfig(ref reason)) if reason.contains("max_concurrent_channels")
    ));
    assert!(host.load_threads.borrow().is_empty());
    let (message, outcome) = host.last_notification();
    assert_eq!(outcome, Outcome::Failure);
    assert!(message.contains("Invalid configuration"), "{message}");
}

#[test]
fn asset_creation_failure_is_fatal() {
    let host = MockHost {
        fail_create: true,
        ..basic_host()
    };

    let err = basic_job().run(&host, &CancelToken::new()).unwrap_err();

    assert!(matches!(err, PackError::Host(HostError { ref path, .. }) if path == "/Game/T_Packed"));
    assert!(host.created.borrow().is_empty());
    let (message, outcome) = host.last_notification();
    assert_eq!(outcome, Outcome::Failure);
    assert!(message.contains("read-only"), "{message}");
}

#[test]
fn job_config_is_applied() {
    let host = MockHost::default().with_source("ramp", gray8_from_fn("ramp", 4, 4, |x, _| x as u8 * 60));
    let job = PackJob::new("/Game/T_Ramp", 4)
        .with_source(ChannelSlot::G, "ramp")
        .with_config(PackConfig {
            max_concurrent_channels: 1,
            gray8_fast_path: false,
            ..PackConfig::default()
        });

    let output = job.run(&host, &CancelToken::new()).unwrap();
    assert_eq!(output.image.pixel_u8(3, 0), Some([0, 180, 0, 255]));
}
