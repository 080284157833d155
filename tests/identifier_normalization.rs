use docmapper::{normalize, DocumentId};

fn assert_one_of(actual: String, accepted: &[&str]) {
    assert!(
        accepted.contains(&actual.as_str()),
        "'{actual}' not in accepted outputs {accepted:?}"
    );
}

#[test]
fn invariant_ascii_is_identity() {
    assert_eq!(normalize("kore", "_"), "kore");
}

#[test]
fn invariant_umlauts_map_to_accepted_set() {
    // Transliteration tables differ; any of these is a valid result.
    assert_one_of(normalize("öäü", "_"), &["_", "oau", "oeaeue"]);
}

#[test]
fn invariant_decomposed_umlauts_map_to_accepted_set() {
    let decomposed = "o\u{308}a\u{308}u\u{308}";
    assert_one_of(normalize(decomposed, "_"), &["_", "oau", "oeaeue"]);
    assert_eq!(normalize(decomposed, "_"), normalize("öäü", "_"));

    let czech = "Z\u{30c}lut\u{30c}ouc\u{30c}ky\u{301} ku\u{30a}n\u{30c}";
    assert_one_of(normalize(czech, "_"), &["_lu_ou_k_k_", "zlutoucky_kun"]);
}

#[test]
fn invariant_czech_maps_to_accepted_set() {
    assert_one_of(
        normalize("Žluťoučký kůň", "_"),
        &["_lu_ou_k_k_", "zlutoucky_kun"],
    );
}

#[test]
fn invariant_punctuation_runs_collapse() {
    let input = "!\"§$%&/(=)Ä'Ö*``'\"";
    assert_one_of(normalize(input, "_"), &["_", "_a_o_", "_ae_oe_"]);
    assert_one_of(normalize(input, "-"), &["-", "-a-o-", "-ae-oe-"]);
}

#[test]
fn invariant_unmappable_input_is_separator() {
    assert_eq!(normalize("", "_"), "_");
    assert_eq!(normalize("  ", "_"), "_");
    assert_eq!(normalize("☃", "-"), "-");
}

#[test]
fn invariant_normalization_is_deterministic() {
    for input in ["kore", "Kore Nordmann", "öäü", "a--b"] {
        assert_eq!(normalize(input, "_"), normalize(input, "_"));
    }
}

#[test]
fn invariant_key_ids_carry_type_prefix() {
    let id = DocumentId::from_key("user", "Kore", "-", "_");
    assert_eq!(id.as_str(), "user-kore");

    let id = DocumentId::from_key("user", "Kore Nordmann", "-", "_");
    assert_eq!(id.as_str(), "user-kore_nordmann");
}
