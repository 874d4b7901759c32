mod common;

use common::{doc, fast_config};
use pdf_batch_submit::infrastructure::{ControlState, Faults, Frame, ScriptedPage};
use pdf_batch_submit::orchestrator::NOT_STARTED_MESSAGE;
use pdf_batch_submit::services::{ChannelProgress, Progress};
use pdf_batch_submit::{BatchOrchestrator, FailureKind, StopHandle, SubmissionFlow, SubmissionResult};
use std::path::PathBuf;

fn names(report: &pdf_batch_submit::Report) -> Vec<String> {
    report.iter().map(|(n, _)| n.to_string()).collect()
}

#[tokio::test]
async fn end_to_end_success_then_auth_failure() {
    let page = ScriptedPage::new()
        .with_response(vec![Frame::text("ok text")])
        .with_response(vec![Frame::auth_error()]);
    let orchestrator = BatchOrchestrator::new(SubmissionFlow::new(&fast_config()), &page, &page);

    let report = orchestrator.run(vec![doc("r-1.pdf"), doc("r-2.pdf")]).await;

    assert_eq!(report.len(), 2);
    assert_eq!(
        report.get("r-1.pdf"),
        Some(&SubmissionResult::Success("ok text".to_string()))
    );
    assert_eq!(
        report.get("r-2.pdf"),
        Some(&SubmissionResult::Failure(FailureKind::AuthenticationError))
    );
    assert!(report.has_auth_failure());
}

#[tokio::test]
async fn processes_in_numeric_suffix_order() {
    let page = ScriptedPage::new()
        .with_response(vec![Frame::text("um")])
        .with_response(vec![Frame::text("dois")])
        .with_response(vec![Frame::text("dez")]);
    let orchestrator = BatchOrchestrator::new(SubmissionFlow::new(&fast_config()), &page, &page);

    let report = orchestrator
        .run(vec![doc("a-10.pdf"), doc("a-2.pdf"), doc("a-1.pdf")])
        .await;

    assert_eq!(names(&report), ["a-1.pdf", "a-2.pdf", "a-10.pdf"]);
    assert_eq!(report.get("a-1.pdf"), Some(&SubmissionResult::Success("um".into())));
    assert_eq!(report.get("a-10.pdf"), Some(&SubmissionResult::Success("dez".into())));

    let bound = page.calls().bound_files;
    assert_eq!(
        bound,
        vec![
            PathBuf::from("/tmp/in/a-1.pdf"),
            PathBuf::from("/tmp/in/a-2.pdf"),
            PathBuf::from("/tmp/in/a-10.pdf"),
        ]
    );
}

#[tokio::test]
async fn sticky_attachment_skips_upload_but_batch_continues() {
    let page = ScriptedPage::new().with_sticky_attachment();
    let orchestrator = BatchOrchestrator::new(SubmissionFlow::new(&fast_config()), &page, &page);

    let report = orchestrator.run(vec![doc("a-1.pdf"), doc("a-2.pdf")]).await;

    assert_eq!(report.len(), 2);
    for (_, result) in report.iter() {
        assert_eq!(result, &SubmissionResult::Failure(FailureKind::AttachmentStillPresent));
    }
    let calls = page.calls();
    assert!(calls.bound_files.is_empty());
    assert_eq!(calls.submits, 0);
}

#[tokio::test]
async fn one_failure_does_not_abort_the_batch() {
    let page = ScriptedPage::new()
        .with_upload_states(vec![ControlState::Disabled, ControlState::Enabled])
        .with_response(vec![Frame::text("segundo")]);
    let orchestrator = BatchOrchestrator::new(SubmissionFlow::new(&fast_config()), &page, &page);

    let report = orchestrator.run(vec![doc("b-1.pdf"), doc("b-2.pdf")]).await;

    assert_eq!(
        report.get("b-1.pdf"),
        Some(&SubmissionResult::Failure(FailureKind::UploadDisabled))
    );
    assert_eq!(
        report.get("b-2.pdf"),
        Some(&SubmissionResult::Success("segundo".into()))
    );
}

#[tokio::test]
async fn content_and_visual_errors_are_classified() {
    let page = ScriptedPage::new()
        .with_response(vec![Frame::text("Muitas solicitações, aguarde.")])
        .with_response(vec![Frame::busy(), Frame::visual_error()])
        .with_response(vec![Frame::text("")]);
    let orchestrator = BatchOrchestrator::new(SubmissionFlow::new(&fast_config()), &page, &page);

    let report = orchestrator
        .run(vec![doc("c-1.pdf"), doc("c-2.pdf"), doc("c-3.pdf")])
        .await;

    assert_eq!(
        report.get("c-1.pdf"),
        Some(&SubmissionResult::Failure(FailureKind::ContentError))
    );
    assert_eq!(
        report.get("c-2.pdf"),
        Some(&SubmissionResult::Failure(FailureKind::RemoteError))
    );
    assert_eq!(
        report.get("c-3.pdf"),
        Some(&SubmissionResult::Failure(FailureKind::RemoteError))
    );
}

#[tokio::test]
async fn panics_become_unknown_errors() {
    let page = ScriptedPage::new().with_faults(Faults {
        panic_on_submit: true,
        ..Default::default()
    });
    let orchestrator = BatchOrchestrator::new(SubmissionFlow::new(&fast_config()), &page, &page);

    let report = orchestrator.run(vec![doc("p-1.pdf"), doc("p-2.pdf")]).await;

    assert_eq!(report.len(), 2);
    for (_, result) in report.iter() {
        match result {
            SubmissionResult::Failure(FailureKind::UnknownError(message)) => {
                assert!(message.contains("scripted automation crash"))
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
    assert_eq!(page.calls().submits, 2);
}

#[tokio::test]
async fn stopped_run_starts_nothing_but_reports_everything() {
    let page = ScriptedPage::new();
    let stop = StopHandle::new();
    stop.stop();
    let orchestrator = BatchOrchestrator::new(SubmissionFlow::new(&fast_config()), &page, &page)
        .with_stop_handle(stop);

    let report = orchestrator.run(vec![doc("s-1.pdf"), doc("s-2.pdf")]).await;

    assert_eq!(report.len(), 2);
    for (_, result) in report.iter() {
        assert_eq!(
            result,
            &SubmissionResult::Failure(FailureKind::UnknownError(NOT_STARTED_MESSAGE.to_string()))
        );
    }
    assert_eq!(page.calls().attachment_checks, 0);
}

#[tokio::test]
async fn reports_progress_after_each_document() {
    let page = ScriptedPage::new()
        .with_response(vec![Frame::text("a")])
        .with_response(vec![Frame::auth_error()]);
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let orchestrator = BatchOrchestrator::new(SubmissionFlow::new(&fast_config()), &page, &page)
        .with_progress(ChannelProgress::new(tx));

    orchestrator.run(vec![doc("x-2.pdf"), doc("x-1.pdf")]).await;
    drop(orchestrator);

    let mut events: Vec<Progress> = Vec::new();
    while let Some(p) = rx.recv().await {
        events.push(p);
    }
    assert_eq!(
        events,
        vec![
            Progress {
                processed: 1,
                total: 2,
                display_name: "x-1.pdf".into(),
                summary: "ok (1 chars)".into(),
            },
            Progress {
                processed: 2,
                total: 2,
                display_name: "x-2.pdf".into(),
                summary: "AuthenticationError".into(),
            },
        ]
    );
}

#[tokio::test]
async fn duplicate_names_each_get_an_entry() {
    let page = ScriptedPage::new()
        .with_response(vec![Frame::text("primeiro")])
        .with_response(vec![Frame::text("segundo")]);
    let orchestrator = BatchOrchestrator::new(SubmissionFlow::new(&fast_config()), &page, &page);

    let report = orchestrator
        .run(vec![doc("dup.pdf"), pdf_batch_submit::Document::new("/tmp/other/dup.pdf", "dup.pdf")])
        .await;

    assert_eq!(names(&report), ["dup.pdf", "dup.pdf (2)"]);
}

#[tokio::test]
async fn report_covers_every_document() {
    for size in [0usize, 1, 5] {
        let mut page = ScriptedPage::new();
        for i in 0..size {
            let frames = if i % 2 == 0 {
                vec![Frame::text(format!("resposta {}", i))]
            } else {
                vec![Frame::visual_error()]
            };
            page = page.with_response(frames);
        }
        let orchestrator =
            BatchOrchestrator::new(SubmissionFlow::new(&fast_config()), &page, &page);

        let docs: Vec<_> = (0..size).map(|i| doc(&format!("d-{}.pdf", i))).collect();
        let report = orchestrator.run(docs).await;

        assert_eq!(report.len(), size);
        for i in 0..size {
            assert!(report.get(&format!("d-{}.pdf", i)).is_some());
        }
    }
}
