/*
 * Copyright © 2023 Archer <archer@nefarious.dev>
 * Licensed under the Apache License, Version 2.0 (the "Licence");
 * you may not use this file except in compliance with the Licence.
 * You may obtain a copy of the Licence at
 *     https://www.apache.org/licenses/LICENSE-2.0
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the Licence is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the Licence for the specific language governing permissions and
 * limitations under the Licence.
 */

#[cfg(not(feature = "serde"))]
compile_error!("this test requires the `serde` feature");

use epochflake::{Snowflake, DISCORD};
use serde::{Deserialize, Serialize};

const JSON: &str = r#"["621611758141964298","999993323446079559","1073325901825187841","907563698409836584","888384053735194644","909399798333972511","852591535089385552"]"#;
const RAW: [u64; 7] = [
    621611758141964298,
    999993323446079559,
    1073325901825187841,
    907563698409836584,
    888384053735194644,
    909399798333972511,
    852591535089385552,
];

#[test]
fn encodes_lists_as_strings() {
    let snowflakes: Vec<Snowflake> = RAW[..2].iter().map(|raw| DISCORD.wrap(*raw)).collect();
    assert_eq!(
        r#"["621611758141964298","999993323446079559"]"#,
        serde_json::to_string(&snowflakes).unwrap()
    );
    let snowflakes: Vec<Snowflake> = RAW.iter().map(|raw| DISCORD.wrap(*raw)).collect();
    assert_eq!(JSON, serde_json::to_string(&snowflakes).unwrap());
}

#[test]
fn decodes_unbound_snowflakes() {
    let snowflakes: Vec<Snowflake> = serde_json::from_str(JSON).unwrap();
    assert_eq!(RAW.len(), snowflakes.len());
    for (snowflake, raw) in snowflakes.iter().zip(RAW) {
        assert_eq!(raw, snowflake.get());
        assert!(snowflake.codec().is_none());
        assert!(snowflake.try_get_timestamp().is_err());
    }
}

#[test]
fn decode_failures_are_errors() {
    assert!(serde_json::from_str::<Vec<Snowflake>>(r#"["12x"]"#).is_err());
    assert!(serde_json::from_str::<Vec<Snowflake>>(r#"["18446744073709551616"]"#).is_err());
    assert!(serde_json::from_str::<Vec<Snowflake>>("[621611758141964298]").is_err());
}

#[test]
fn embedded_in_documents() {
    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Message<'a> {
        #[serde(borrow)]
        author: &'a str,
        id: Snowflake<'static>,
    }

    let message = Message {
        author: "ferris",
        id: DISCORD.wrap(1073325901825187841),
    };
    let json = serde_json::to_string(&message).unwrap();
    assert_eq!(r#"{"author":"ferris","id":"1073325901825187841"}"#, json);
    let back: Message = serde_json::from_str(&json).unwrap();
    assert_eq!(message, back);
    assert_eq!(1675971236426, back.id.bind(&DISCORD).get_timestamp());
}
