use folio_core::catalog;
use folio_core::preload::{LoadOutcome, Manifest, PreloadPlan, PreloadProgress, PreloadState};

#[test]
fn progress_is_monotone_and_reaches_one_on_last_completion() {
    let manifest = Manifest {
        images: vec!["/assets/a.png".into(), "/assets/b.png".into()],
        videos: vec!["/assets/c.mp4".into()],
    };
    let plan = PreloadPlan::build(catalog::critical_images(), &manifest);
    let total = plan.len();
    assert_eq!(total, catalog::critical_images().len() + 3);

    // Every third load fails; failures advance progress like successes.
    let outcomes: Vec<LoadOutcome> = (0..total)
        .map(|index| {
            if index % 3 == 1 {
                LoadOutcome::Failed
            } else {
                LoadOutcome::Loaded
            }
        })
        .collect();

    let mut progress = PreloadProgress::new(total);
    let mut state = PreloadState::new();
    let mut last = 0.0;
    for (step, outcome) in outcomes.iter().enumerate() {
        let fraction = progress.record(*outcome);
        state.report(fraction);
        assert!(fraction >= last);
        last = fraction;
        if step + 1 < total {
            assert!(fraction < 1.0);
            assert!(!progress.is_done());
        }
    }
    assert_eq!(last, 1.0);
    assert!(progress.is_done());
    assert_eq!(progress.completed(), total);
    assert_eq!(
        progress.failed(),
        outcomes.iter().filter(|o| **o == LoadOutcome::Failed).count()
    );
    assert!(state.finish());
    assert_eq!(state.progress(), 1.0);
}

#[test]
fn extra_completions_do_not_overshoot() {
    let mut progress = PreloadProgress::new(2);
    progress.record(LoadOutcome::Loaded);
    progress.record(LoadOutcome::Failed);
    assert_eq!(progress.record(LoadOutcome::Failed), 1.0);
    assert_eq!(progress.completed(), 2);
    assert_eq!(progress.failed(), 1);
}

#[test]
fn all_failures_still_complete() {
    let mut progress = PreloadProgress::new(3);
    let fractions: Vec<f64> = (0..3)
        .map(|_| progress.record(LoadOutcome::Failed))
        .collect();
    assert_eq!(fractions, vec![1.0 / 3.0, 2.0 / 3.0, 1.0]);
    assert!(progress.is_done());
    assert_eq!(progress.failed(), 3);
}

#[test]
fn restored_session_is_ready() {
    let state = PreloadState::already_ready();
    assert!(state.ready());
    assert_eq!(state.progress(), 1.0);
}
