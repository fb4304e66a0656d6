// Copyright Materialize, Inc. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository, or online at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use serde_test::{assert_tokens, Token};

use bignum::{BigNum, OrderedBigNum};

#[test]
fn test_serde() {
    let d: BigNum = "-12.34".parse().unwrap();
    assert_tokens(&d, &[Token::Str("-12.34")]);

    let d: BigNum = "1234567890123456789012345678901234567890".parse().unwrap();
    assert_tokens(&d, &[Token::Str("1234567890123456789012345678901234567890")]);

    let d: BigNum = "0.0001".parse().unwrap();
    assert_tokens(&d, &[Token::Str("0.0001")]);

    let d = OrderedBigNum("42".parse().unwrap());
    assert_tokens(&d, &[Token::Str("42")]);
}

#[test]
fn test_serde_json() {
    let d: BigNum = serde_json::from_str(r#""6.25e2""#).unwrap();
    assert_eq!(d.to_string(), "625");
    assert_eq!(serde_json::to_string(&d).unwrap(), r#""625""#);

    for (json, err) in vec![
        ("1", "invalid type: integer `1`, expected a decimal number string"),
        ("0.5", "invalid type: floating point `0.5`, expected a decimal number string"),
        (r#""12..3""#, "invalid number syntax"),
    ] {
        assert!(
            serde_json::from_str::<BigNum>(json)
                .unwrap_err()
                .to_string()
                .starts_with(err),
            "unexpected error for {}",
            json
        );
    }
}
