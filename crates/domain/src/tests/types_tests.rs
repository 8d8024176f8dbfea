// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Bread, DomainError, Filling, OrderDetail, Sauce};

#[test]
fn test_filling_string_roundtrip() {
    for filling in [
        Filling::Bacon,
        Filling::Sausage,
        Filling::Egg,
        Filling::VeganSausage,
    ] {
        assert_eq!(filling.as_str().parse::<Filling>().unwrap(), filling);
    }
}

#[test]
fn test_unknown_filling_rejected() {
    let err: DomainError = "halloumi".parse::<Filling>().unwrap_err();
    assert_eq!(err, DomainError::InvalidFilling(String::from("halloumi")));
}

#[test]
fn test_detail_parse_from_stored_columns() {
    let detail: OrderDetail = OrderDetail::parse("bacon", "white", "brown").unwrap();
    assert_eq!(
        detail,
        OrderDetail::new(Filling::Bacon, Bread::White, Sauce::Brown)
    );
}

#[test]
fn test_detail_parse_rejects_bad_column() {
    assert!(matches!(
        OrderDetail::parse("bacon", "rye", "red"),
        Err(DomainError::InvalidBread(_))
    ));
}

#[test]
fn test_detail_serde_uses_snake_case() {
    let detail: OrderDetail = OrderDetail::new(Filling::VeganSausage, Bread::Brown, Sauce::Red);
    let json: String = serde_json::to_string(&detail).unwrap();
    assert!(json.contains("\"vegan_sausage\""));
    let back: OrderDetail = serde_json::from_str(&json).unwrap();
    assert_eq!(back, detail);
}
