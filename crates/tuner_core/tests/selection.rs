use tuner_core::{resolve, resolve_default, SelectionError, TrainedModel};

fn listing() -> Vec<TrainedModel> {
    vec![
        TrainedModel {
            job_id: 7,
            base_model: "llama-7b".to_string(),
        },
        TrainedModel {
            job_id: 3,
            base_model: "llama-3b".to_string(),
        },
    ]
}

#[test]
fn empty_listing_yields_no_selection() {
    assert_eq!(resolve_default(&[]), None);
}

#[test]
fn default_selection_is_first_listing_entry() {
    let sel = resolve_default(&listing()).expect("default selection");
    assert_eq!(sel.job_id, 7);
    assert_eq!(sel.adapter_id, 7);
    assert_eq!(sel.base_model, "llama-7b");
}

#[test]
fn explicit_pick_updates_both_dependent_fields() {
    let sel = resolve(3, &listing()).expect("resolved");
    assert_eq!(sel.adapter_id, 3);
    assert_eq!(sel.base_model, "llama-3b");
    assert_eq!(sel.job_id, sel.adapter_id);
}

#[test]
fn unknown_pick_is_an_invariant_error() {
    let err = resolve(42, &listing()).unwrap_err();
    assert_eq!(err, SelectionError::NotFound(42));
}
