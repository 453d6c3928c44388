//! Audio cue boundary.
//!
//! The simulation emits discrete `AudioEvent`s and never holds mixer state;
//! this module is the external collaborator that turns those events into
//! playback. If an asset is missing, Bevy's audio path simply plays nothing,
//! so the simulation proceeds regardless.

use bevy::audio::Volume;
use bevy::prelude::*;

pub struct GameAudioPlugin;

impl Plugin for GameAudioPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<AudioEvent>()
            .init_resource::<AudioHandles>()
            .init_resource::<FootstepsLoop>()
            .add_systems(Startup, load_audio_handles)
            .add_systems(Update, play_audio_events);
    }
}

/// Discrete cues produced by the simulation core.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioEvent {
    Jump,
    FootstepsStart,
    FootstepsStop,
    FireballCast,
    DoorUnlock,
    EndingBegin,
}

/// Preloaded clip handles. Handles are reference-counted pointers into the
/// asset store, so keeping them here keeps the decoded audio alive.
#[derive(Resource, Default)]
pub struct AudioHandles {
    pub jump: Option<Handle<AudioSource>>,
    pub walk: Option<Handle<AudioSource>>,
    pub fireball: Option<Handle<AudioSource>>,
    pub unlock: Option<Handle<AudioSource>>,
    pub ending: Option<Handle<AudioSource>>,
}

/// Entity currently playing the looping walk clip, if any.
#[derive(Resource, Default)]
struct FootstepsLoop(Option<Entity>);

fn load_audio_handles(asset_server: Res<AssetServer>, mut handles: ResMut<AudioHandles>) {
    handles.jump = Some(asset_server.load("audio/jump.ogg"));
    handles.walk = Some(asset_server.load("audio/walk.ogg"));
    handles.fireball = Some(asset_server.load("audio/fireball.ogg"));
    handles.unlock = Some(asset_server.load("audio/unlock.ogg"));
    handles.ending = Some(asset_server.load("audio/ending.ogg"));

    info!("Queued audio clips; missing files under assets/audio/ play silently.");
}

fn play_audio_events(
    mut commands: Commands,
    mut events: EventReader<AudioEvent>,
    handles: Res<AudioHandles>,
    mut footsteps: ResMut<FootstepsLoop>,
) {
    for event in events.read() {
        match event {
            AudioEvent::Jump => play_once(&mut commands, &handles.jump, 0.3),
            AudioEvent::FireballCast => play_once(&mut commands, &handles.fireball, 0.3),
            AudioEvent::DoorUnlock => play_once(&mut commands, &handles.unlock, 0.5),
            AudioEvent::EndingBegin => play_once(&mut commands, &handles.ending, 0.4),
            AudioEvent::FootstepsStart => {
                if footsteps.0.is_none() {
                    if let Some(source) = handles.walk.clone() {
                        let entity = commands
                            .spawn(AudioBundle {
                                source,
                                settings: PlaybackSettings::LOOP.with_volume(Volume::new(0.4)),
                            })
                            .id();
                        footsteps.0 = Some(entity);
                    }
                }
            }
            AudioEvent::FootstepsStop => {
                if let Some(entity) = footsteps.0.take() {
                    commands.entity(entity).despawn();
                }
            }
        }
    }
}

fn play_once(commands: &mut Commands, handle: &Option<Handle<AudioSource>>, volume: f32) {
    if let Some(source) = handle.clone() {
        commands.spawn(AudioBundle {
            source,
            settings: PlaybackSettings::DESPAWN.with_volume(Volume::new(volume)),
        });
    }
}
