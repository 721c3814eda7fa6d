#![allow(missing_docs)]

use graphdump::{
    CacheKey, DumpType, Dumpable, Dumper, Lookup, MemberFilter, ProcedureCache, TypeDumpConfig,
};

#[derive(Dumpable)]
struct Ticket {
    id: u32,
}

#[derive(Dumpable)]
struct TicketMeta {
    id: (),
}

fn key() -> CacheKey {
    CacheKey::new(
        Ticket::static_type_info(),
        &TypeDumpConfig::default(),
        None,
        MemberFilter::default(),
    )
}

#[test]
fn test_building_protocol() {
    let cache = ProcedureCache::new();
    let key = key();

    assert!(matches!(cache.try_find(&key), Lookup::Miss));
    assert!(cache.mark_building(&key));
    assert!(!cache.mark_building(&key));
    assert!(matches!(cache.try_find(&key), Lookup::Building));
    assert_eq!(cache.building(), 1);

    cache.abandon(&key);
    assert!(matches!(cache.try_find(&key), Lookup::Miss));
    assert_eq!(cache.building(), 0);
    assert!(cache.is_empty());
}

#[test]
fn test_reset_clears_building_markers() {
    let cache = ProcedureCache::new();
    let key = key();

    cache.mark_building(&key);
    cache.reset();

    assert_eq!(cache.building(), 0);
    assert!(cache.mark_building(&key));
}

#[test]
fn test_keys_distinguish_configuration() {
    let base = key();
    let other_config = CacheKey::new(
        Ticket::static_type_info(),
        &TypeDumpConfig::default().skip_nulls(),
        None,
        MemberFilter::default(),
    );
    let other_filter = CacheKey::new(
        Ticket::static_type_info(),
        &TypeDumpConfig::default(),
        None,
        MemberFilter::public_only(),
    );
    let with_metadata = CacheKey::new(
        Ticket::static_type_info(),
        &TypeDumpConfig::default(),
        Some(TicketMeta::static_type_info()),
        MemberFilter::default(),
    );

    assert_eq!(base, key());
    assert_ne!(base, other_config);
    assert_ne!(base, other_filter);
    assert_ne!(base, with_metadata);
    assert!(with_metadata.has_metadata());
    assert_eq!(with_metadata.to_string(), "cache_tests::Ticket +metadata");
}

#[test]
fn test_dumper_installs_into_cache() -> graphdump::Result<()> {
    let dumper = Dumper::new();
    let ticket = Ticket { id: 1 };

    dumper.dump(&ticket)?;

    match dumper.cache().try_find(&key()) {
        Lookup::Found(procedure) => {
            assert_eq!(procedure.key(), &key());
            assert_eq!(procedure.member_names().collect::<Vec<_>>(), ["id"]);
        }
        other => panic!("expected an installed procedure, got {other:?}"),
    }
    assert_eq!(dumper.cache().installs(), 1);
    Ok(())
}

#[test]
fn test_interpreted_dumps_leave_cache_untouched() -> graphdump::Result<()> {
    let dumper = Dumper::new();
    dumper.dump_interpreted(&Ticket { id: 2 }, &graphdump::DumpOptions::new())?;

    assert!(dumper.cache().is_empty());
    assert_eq!(dumper.cache().installs(), 0);
    Ok(())
}
