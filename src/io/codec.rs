//! Binary animation codec over the chunk container.
//!
//! Layout, after the container signature:
//!
//! ```text
//! VRSNDATA   u16 major, u16 minor
//! ANIMDATA   target type name, animation name, f32 length, u8 looped
//! TRCKDATA   track name, u32 interpolation mode     } repeated per track,
//! KEFRAMES   i32 key count, then f32 time + payload } descending key count
//! ```
//!
//! Tracks without keys are not written. The wire format carries no value
//! kind, so loading joins track names against the caller's registrations to
//! recover kinds and capability sets.

use std::io::{self, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use log::debug;

use crate::animation::Animation;
use crate::error::AnimationError;
use crate::interpolation::InterpolationMode;
use crate::keyframe::KeyFrame;
use crate::registration::TrackRegistration;
use crate::track::Track;
use crate::value::{TextureRef, Value, ValueKind};

use super::chunk::{ChunkId, ChunkReader, ChunkWriter};

const VERSION_CHUNK: ChunkId = *b"VRSNDATA";
const ANIMATION_CHUNK: ChunkId = *b"ANIMDATA";
const TRACK_CHUNK: ChunkId = *b"TRCKDATA";
const KEYFRAMES_CHUNK: ChunkId = *b"KEFRAMES";

/// Version tag written by this codec. A file whose major version differs
/// cannot be read.
pub const VERSION: (u16, u16) = (1, 0);

/// Serialize an animation to a writer. `type_name` records the kind of
/// object the animation was authored for and is informational only.
pub fn save<W: Write>(
    animation: &Animation,
    type_name: &str,
    writer: W,
) -> Result<(), AnimationError> {
    let mut out = ChunkWriter::new(writer)?;

    out.begin(VERSION_CHUNK)?;
    out.write_u16::<LittleEndian>(VERSION.0)?;
    out.write_u16::<LittleEndian>(VERSION.1)?;
    out.end()?;

    out.begin(ANIMATION_CHUNK)?;
    out.write_string(type_name)?;
    out.write_string(animation.name())?;
    out.write_f32::<LittleEndian>(animation.length())?;
    out.write_u8(animation.looped() as u8)?;
    out.end()?;

    // Largest tracks first, so a streaming reader touches the bulk of the
    // data early.
    let mut order: Vec<&Track> = animation
        .tracks()
        .iter()
        .filter(|t| t.key_count() > 0)
        .collect();
    order.sort_by(|a, b| b.key_count().cmp(&a.key_count()));

    for track in order {
        out.begin(TRACK_CHUNK)?;
        out.write_string(track.name())?;
        out.write_u32::<LittleEndian>(track.mode().as_u32())?;
        out.end()?;

        out.begin(KEYFRAMES_CHUNK)?;
        out.write_i32::<LittleEndian>(track.key_count() as i32)?;
        for key in track.keys() {
            out.write_f32::<LittleEndian>(key.time())?;
            write_value(&mut out, key.value())?;
        }
        out.end()?;
    }

    out.finish()?;
    Ok(())
}

/// Deserialize an animation from a reader. Track names are joined against
/// `registrations` to recover value kinds; a track whose name matches no
/// registration fails with a schema mismatch.
///
/// Loaded animations play at unit speed with an unlimited loop budget, as
/// neither is part of the wire format.
pub fn load<R: Read>(
    reader: R,
    registrations: &[TrackRegistration],
) -> Result<Animation, AnimationError> {
    let mut input = ChunkReader::new(reader)?;

    input.expect_chunk(VERSION_CHUNK)?;
    let major = input.read_u16::<LittleEndian>()?;
    let minor = input.read_u16::<LittleEndian>()?;
    if major != VERSION.0 {
        return Err(AnimationError::UnsupportedVersion { major, minor });
    }

    input.expect_chunk(ANIMATION_CHUNK)?;
    let type_name = input.read_string()?;
    let name = input.read_string()?;
    let length = input.read_f32::<LittleEndian>()?;
    let looped = input.read_u8()? != 0;
    debug!("loading animation '{}' for target type '{}'", name, type_name);

    let mut builder = Animation::builder(name).length(length).looped(looped);

    while let Some(id) = input.next_chunk()? {
        if id != TRACK_CHUNK {
            continue;
        }
        let track_name = input.read_string()?;
        let raw_mode = input.read_u32::<LittleEndian>()?;
        let mode = InterpolationMode::from_u32(raw_mode).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("unknown interpolation mode {raw_mode}"),
            )
        })?;

        let registration = registrations
            .iter()
            .find(|r| r.name() == track_name)
            .ok_or_else(|| AnimationError::SchemaMismatch {
                track: track_name.clone(),
            })?;

        let mut track = Track::with_support(
            track_name,
            registration.kind(),
            registration.supported_interpolation(),
        )?;
        track.set_mode(mode);

        input.expect_chunk(KEYFRAMES_CHUNK)?;
        let count = input.read_i32::<LittleEndian>()?;
        if count < 0 {
            return Err(AnimationError::Io(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("negative key count {count}"),
            )));
        }
        for _ in 0..count {
            let time = input.read_f32::<LittleEndian>()?;
            let value = read_value(&mut input, registration.kind())?;
            track.add_key(KeyFrame::new(time, value)?)?;
        }

        builder = builder.track(track);
    }

    builder.build()
}

fn write_value<W: Write>(out: &mut ChunkWriter<W>, value: &Value) -> io::Result<()> {
    match value {
        Value::Single(v) => out.write_f32::<LittleEndian>(*v),
        Value::Vec2(v) => write_floats(out, v),
        Value::Vec3(v) => write_floats(out, v),
        Value::Vec4(v) | Value::Quat(v) | Value::Rect(v) | Value::Color(v) => {
            write_floats(out, v)
        }
        Value::Texture(t) => {
            out.write_string(&t.texture)?;
            write_floats(out, &t.coordinates)?;
            out.write_u16::<LittleEndian>(t.array_index)
        }
    }
}

fn write_floats<W: Write>(out: &mut ChunkWriter<W>, values: &[f32]) -> io::Result<()> {
    for v in values {
        out.write_f32::<LittleEndian>(*v)?;
    }
    Ok(())
}

fn read_value<R: Read>(input: &mut ChunkReader<R>, kind: ValueKind) -> io::Result<Value> {
    Ok(match kind {
        ValueKind::Single => Value::Single(input.read_f32::<LittleEndian>()?),
        ValueKind::Vec2 => Value::Vec2(read_floats(input)?),
        ValueKind::Vec3 => Value::Vec3(read_floats(input)?),
        ValueKind::Vec4 => Value::Vec4(read_floats(input)?),
        ValueKind::Quat => Value::Quat(read_floats(input)?),
        ValueKind::Rect => Value::Rect(read_floats(input)?),
        ValueKind::Color => Value::Color(read_floats(input)?),
        ValueKind::Texture => {
            let texture = input.read_string()?;
            let coordinates = read_floats(input)?;
            let array_index = input.read_u16::<LittleEndian>()?;
            Value::Texture(TextureRef {
                texture,
                coordinates,
                array_index,
            })
        }
    })
}

fn read_floats<R: Read, const N: usize>(input: &mut ChunkReader<R>) -> io::Result<[f32; N]> {
    let mut out = [0.0f32; N];
    input.read_f32_into::<LittleEndian>(&mut out)?;
    Ok(out)
}
