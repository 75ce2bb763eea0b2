// /////////////////////////////////////////////////////////////////////////////
// SealDB
// Copyright (c) 2025 SealDB Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Minimal library-usage walkthrough: open a fresh container, create a
//! collection, insert a document, find it back, then reopen the same file
//! to show the write survived the round trip.

use std::collections::BTreeMap;

use sealdb_bootstrap::{BootstrapConfig, LogLevel};
use sealdb_domain::value_objects::query::FindOptions;
use sealdb_domain::value_objects::value::Value;

fn obj(pairs: Vec<(&str, Value)>) -> Value {
    Value::Object(pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect::<BTreeMap<_, _>>())
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    sealdb_bootstrap::init_tracing(LogLevel::Info)?;

    let dir = std::env::temp_dir().join("sealdb-quickstart");
    std::fs::create_dir_all(&dir)?;
    let path = dir.join("quickstart.vdb");
    let passphrase = "correct horse battery staple";

    let schema = Value::Object(BTreeMap::from([(
        "name".to_string(),
        obj(vec![("type", Value::from("string")), ("required", Value::from(true))]),
    )]));

    {
        let config = BootstrapConfig::new(&path);
        let engine = sealdb_bootstrap::open(&config, passphrase).await?;
        engine.create_collection("widgets", &schema, vec![]).await?;
        let stored = engine.insert("widgets", &obj(vec![("name", Value::from("left-handed hammer"))])).await?;
        println!("inserted: {}", stored.to_json());
    }

    let config = BootstrapConfig::new(&path);
    let engine = sealdb_bootstrap::open(&config, passphrase).await?;
    let found = engine.find("widgets", &obj(vec![]), &FindOptions::default()).await?;
    println!("after reopen, {} document(s) found", found.len());
    for doc in &found {
        println!("  {}", doc.to_json());
    }

    Ok(())
}
