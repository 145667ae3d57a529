//! Chaser: direct pursuit plus body contact. The baseline archetype; all
//! of its behavior lives in the shared body helpers.

use data_runtime::configs::bosses::BossSpec;

use crate::context::FrameCtx;
use crate::player::PlayerView;

use super::{resolve_player_contact, BossBody};

pub fn update(body: &mut BossBody, base: &BossSpec, player: &PlayerView, ctx: &mut FrameCtx) {
    if !body.in_contact_stun() {
        let speed = body.speed;
        body.seek(player.pos, speed, ctx.dt);
    }
    let _ = resolve_player_contact(body, base, player, ctx.events);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boss::{Boss, BossClass, BossId};
    use crate::context::NoopHooks;
    use crate::events::EncounterEvent;
    use data_runtime::configs::bosses::BossSpecDb;
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn frame<'a>(
        projectiles: &'a mut Vec<crate::projectile::Projectile>,
        events: &'a mut Vec<EncounterEvent>,
        rng: &'a mut ChaCha8Rng,
        hooks: &'a mut NoopHooks,
    ) -> FrameCtx<'a> {
        FrameCtx {
            dt: 1.0 / 60.0,
            arena_w: 800.0,
            arena_h: 600.0,
            projectiles,
            events,
            rng,
            hooks,
        }
    }

    #[test]
    fn closes_distance_each_frame() {
        let db = BossSpecDb::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut boss = Boss::spawn(
            BossId(1),
            BossClass::Chaser,
            1,
            Vec2::new(100.0, 100.0),
            &db,
            0.5,
            0.0,
            &mut rng,
        );
        let player = PlayerView {
            pos: Vec2::new(400.0, 300.0),
            ..PlayerView::default()
        };
        let mut projectiles = Vec::new();
        let mut events = Vec::new();
        let mut hooks = NoopHooks;
        let d0 = boss.body.pos.distance(player.pos);
        let mut ctx = frame(&mut projectiles, &mut events, &mut rng, &mut hooks);
        boss.update(&player, &db, &mut ctx);
        assert!(boss.body.pos.distance(player.pos) < d0);
    }

    #[test]
    fn contact_knocks_player_and_recoils() {
        let db = BossSpecDb::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut boss = Boss::spawn(
            BossId(1),
            BossClass::Chaser,
            1,
            Vec2::new(400.0, 300.0),
            &db,
            0.5,
            0.0,
            &mut rng,
        );
        let player = PlayerView {
            pos: Vec2::new(410.0, 300.0),
            ..PlayerView::default()
        };
        let mut projectiles = Vec::new();
        let mut events = Vec::new();
        let mut hooks = NoopHooks;
        let mut ctx = frame(&mut projectiles, &mut events, &mut rng, &mut hooks);
        boss.update(&player, &db, &mut ctx);
        let hit = events.iter().find_map(|e| match e {
            EncounterEvent::PlayerBossCollision { class, damage, knockback } => {
                Some((*class, *damage, *knockback))
            }
            _ => None,
        });
        let (class, damage, knockback) = hit.expect("contact event");
        assert_eq!(class, BossClass::Chaser);
        assert_eq!(damage, db.chaser.contact_damage);
        assert!(knockback.x > 0.0);
        assert!(boss.body.in_contact_stun());
        // Recoil carries the boss away from the player.
        assert!(boss.body.contact.vel.x < 0.0);
    }

    #[test]
    fn contact_suppressed_while_immune_or_self_stunned() {
        let db = BossSpecDb::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut boss = Boss::spawn(
            BossId(1),
            BossClass::Chaser,
            1,
            Vec2::new(400.0, 300.0),
            &db,
            0.5,
            0.0,
            &mut rng,
        );
        let player = PlayerView {
            pos: Vec2::new(405.0, 300.0),
            immunity_s: 1.0,
            ..PlayerView::default()
        };
        let mut projectiles = Vec::new();
        let mut events = Vec::new();
        let mut hooks = NoopHooks;
        let mut ctx = frame(&mut projectiles, &mut events, &mut rng, &mut hooks);
        boss.update(&player, &db, &mut ctx);
        assert!(events.is_empty());

        // Same overlap with no immunity but a live self-stun.
        boss.body.contact.stun_s = 0.3;
        let player = PlayerView {
            pos: Vec2::new(405.0, 300.0),
            ..PlayerView::default()
        };
        let mut ctx = frame(&mut projectiles, &mut events, &mut rng, &mut hooks);
        boss.update(&player, &db, &mut ctx);
        assert!(events.is_empty());
    }
}
