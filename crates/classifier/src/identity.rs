//! User identity extraction

use crate::openrtb::{Eid, User};
use std::collections::BTreeMap;

/// Known extended-id sources and their canonical id type
const ID_SOURCES: &[(&str, &str)] = &[
    ("uidapi.com", "uid2"),
    ("id5-sync.com", "id5"),
    ("liveramp.com", "liveramp"),
    ("criteo.com", "criteo"),
    ("pubcid.org", "pubcid"),
    ("sharedid.org", "sharedid"),
    ("adserver.org", "ttd"),
    ("intentiq.com", "intentiq"),
    ("quantcast.com", "quantcast"),
    ("crwdcntrl.net", "lotame"),
    ("merkleinc.com", "merkle"),
    ("netid.de", "netid"),
    ("yahoo.com", "connectid"),
    ("audigent.com", "hadron"),
];

/// Id type recorded for the raw publisher user id
pub const USER_ID: &str = "user_id";
/// Id type recorded for the buyer-side user id
pub const BUYER_UID: &str = "buyer_uid";

/// Canonical id type for an extended-id source domain
pub fn canonical_id_type(source: &str) -> Option<&'static str> {
    let source = source.trim().to_ascii_lowercase();
    ID_SOURCES
        .iter()
        .find(|(domain, _)| *domain == source)
        .map(|(_, id_type)| *id_type)
}

/// Available identity types for the request, id-type -> value
///
/// The first non-empty uid of each known source is taken; the raw user id
/// and buyer id fill in only when not already captured.
pub fn extract_user_ids(user: Option<&User>) -> BTreeMap<String, String> {
    let mut ids = BTreeMap::new();
    let Some(user) = user else {
        return ids;
    };

    let eids: &[Eid] = if !user.eids.is_empty() {
        &user.eids
    } else {
        user.ext.as_ref().map(|ext| ext.eids.as_slice()).unwrap_or(&[])
    };

    for eid in eids {
        let Some(id_type) = canonical_id_type(&eid.source) else {
            continue;
        };
        if ids.contains_key(id_type) {
            continue;
        }
        if let Some(uid) = eid.uids.iter().find(|uid| !uid.id.is_empty()) {
            ids.insert(id_type.to_string(), uid.id.clone());
        }
    }

    let fallbacks = [(USER_ID, &user.id), (BUYER_UID, &user.buyeruid)];
    for (id_type, value) in fallbacks {
        if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
            ids.entry(id_type.to_string())
                .or_insert_with(|| value.to_string());
        }
    }

    ids
}
