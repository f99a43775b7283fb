#![no_main]
use libfuzzer_sys::fuzz_target;
use std::collections::BTreeMap;
use std::sync::Arc;
use triedb::{ByteKey, Index};

fuzz_target!(|ops: Vec<(ByteKey, Option<u8>)>| {
    let mut index = Index::new();
    let mut model = BTreeMap::new();
    for (key, value) in ops.iter() {
        if key.is_empty() {
            continue;
        }
        match value {
            Some(v) => {
                index.insert(key.as_ref(), Arc::new(*v)).unwrap();
                model.insert(key.clone(), *v);
            }
            None => {
                index.remove(key.as_ref()).unwrap();
                model.remove(key);
            }
        }
        assert_eq!(index.len(), model.len());
    }
    let got: Vec<(ByteKey, u8)> = index.iter().map(|(k, v)| (k, **v)).collect();
    let expected: Vec<(ByteKey, u8)> = model.into_iter().collect();
    assert_eq!(got, expected);
});
