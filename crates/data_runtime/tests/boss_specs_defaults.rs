use data_runtime::configs::bosses::BossSpecDb;
use data_runtime::configs::encounter::EncounterTuning;

#[test]
fn archetypes_have_distinct_bases() {
    let db = BossSpecDb::load_default().expect("bosses");
    // The four archetypes must not share a single stat line.
    assert!(db.gravity_well.base_hp > db.chaser.base_hp);
    assert!(db.nexus_weaver.base_hp > db.mirror_shield.base_hp);
    assert!(db.chaser.speed > db.gravity_well.speed);
}

#[test]
fn weaver_formulas_match_tier_four() {
    // Tier 4 must yield 5 drones, 2 lancers, 1 orbiter with default tuning.
    let w = BossSpecDb::load_default().expect("bosses").weaver;
    let drones = w.drone_base + (4.0 * w.drone_per_tier) as u32;
    let lancers = w.lancer_base + (3.0 * w.lancer_per_tier) as u32;
    let orbiters = w.orbiter_base + (2.0 * w.orbiter_per_tier) as u32;
    assert_eq!((drones, lancers, orbiters), (5, 2, 1));
}

#[test]
fn tuning_file_matches_defaults() {
    // The checked-in TOML should not silently drift from compiled defaults.
    let file = EncounterTuning::load_default().expect("tuning");
    let code = EncounterTuning::default();
    assert_eq!(file.first_threshold, code.first_threshold);
    assert_eq!(file.elite_interval, code.elite_interval);
    assert_eq!(file.wave_cap, code.wave_cap);
}
