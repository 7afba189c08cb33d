//! Sound cues raised by the simulation.
//!
//! Systems push cues into the [`SoundQueue`] resource; the host drains it once
//! per frame and plays whatever it likes. Nothing in the simulation waits on
//! playback.

use crate::ecs::World;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sound {
    CannonShot,
    ProjectileHit,
    Death,
    GameOver,
    LevelComplete,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SoundQueue(Vec<Sound>);

impl SoundQueue {
    pub fn push(&mut self, sound: Sound) {
        self.0.push(sound);
    }

    pub fn drain(&mut self) -> Vec<Sound> {
        std::mem::take(&mut self.0)
    }

    pub fn pending(&self) -> &[Sound] {
        &self.0
    }
}

/// Queue `sound` if the world carries a [`SoundQueue`]; silent otherwise.
pub fn play(world: &mut World, sound: Sound) {
    match world.resource_mut::<SoundQueue>() {
        Ok(queue) => queue.push(sound),
        Err(_) => log::trace!("no sound queue, dropping {:?}", sound),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn play_without_queue_is_a_no_op() {
        let mut world = World::new();
        play(&mut world, Sound::Death);
        assert!(!world.has_resource::<SoundQueue>());
    }

    #[test]
    fn drain_empties_queue_in_order() {
        let mut world = World::new();
        world.set_resource(SoundQueue::default());
        play(&mut world, Sound::CannonShot);
        play(&mut world, Sound::ProjectileHit);
        let queue = world.resource_mut::<SoundQueue>().expect("queue");
        assert_eq!(queue.drain(), vec![Sound::CannonShot, Sound::ProjectileHit]);
        assert!(queue.pending().is_empty());
    }
}
