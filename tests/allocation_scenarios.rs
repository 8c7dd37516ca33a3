// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! End-to-end allocation and upload scenarios on both backend tiers.

use std::panic::{AssertUnwindSafe, catch_unwind};

use texture_units::backend::{
    Call, Capabilities, DataType, FilterMode, Format, RecordingBackend, Target, share,
};
use texture_units::bindings::{ManagerConfig, Quality, TextureManager, TextureParameters};
use texture_units::error::FatalError;
use texture_units::pixel_formats::translate::format_for;
use texture_units::pixel_formats::{ChannelLayout, ElementType, OwnedPixelBuffer};

fn fatal<F: FnOnce()>(f: F) -> FatalError {
    let payload = catch_unwind(AssertUnwindSafe(f)).expect_err("expected a fatal error");
    payload
        .downcast_ref::<FatalError>()
        .expect("payload should be a FatalError")
        .clone()
}

#[test]
fn single_channels_collapse_on_mobile_only() {
    let mobile = Capabilities::mobile();
    let desktop = Capabilities::desktop();
    let channels = [ChannelLayout::R, ChannelLayout::G, ChannelLayout::B];

    let on_mobile: Vec<_> = channels.iter().map(|&c| format_for(c, &mobile)).collect();
    assert_eq!(on_mobile, vec![Some(Format::Alpha); 3]);

    let on_desktop: Vec<_> = channels.iter().map(|&c| format_for(c, &desktop)).collect();
    assert_eq!(
        on_desktop,
        vec![Some(Format::Red), Some(Format::Green), Some(Format::Blue)]
    );
}

/// A NEAREST texture allocated without data gets a pooled handle and nothing else.
#[test]
fn allocate_empty_nearest_texture() {
    let backend = RecordingBackend::desktop();
    let recording = backend.recording();
    let mut manager = TextureManager::new(share(backend));

    let texture = manager.allocate(TextureParameters::new(Quality::Nearest), None);

    assert!(recording.is_live(texture.handle()));
    assert_eq!(
        recording.count(|c| matches!(c, Call::GenTextures { count: 64 })),
        1
    );
    assert!(recording.uploads().is_empty());
    assert_eq!(texture.parameters().min_filter(), FilterMode::Nearest);
    assert_eq!(texture.parameters().mag_filter(), FilterMode::Nearest);
    assert_eq!(texture.format(), None);
}

/// Luminance-alpha data on a mobile backend without a native luminance-alpha format is stored
/// as two-channel RG.
#[test]
fn luminance_alpha_on_limited_mobile_backend() {
    let capabilities = Capabilities {
        luminance_alpha: false,
        ..Capabilities::mobile()
    };
    let backend = RecordingBackend::new(capabilities, 8);
    let recording = backend.recording();
    let mut manager = TextureManager::new(share(backend));

    let pixels = OwnedPixelBuffer::zeroed(ChannelLayout::LA, ElementType::Byte, vec![4, 4]);
    let texture = manager.allocate(TextureParameters::default(), Some(&pixels));

    assert_eq!(
        recording.uploads(),
        vec![Call::TexImage {
            target: Target::Texture2D,
            internal_format: Format::Rg,
            size: [4, 4, 1],
            format: Format::Rg,
            data_type: DataType::UnsignedByte,
            initialized: true,
        }]
    );
    assert_eq!(texture.size(), [4, 4, 1]);
    assert_eq!(texture.format(), Some(Format::Rg));
}

#[test]
fn filtered_preset() {
    let parameters = TextureParameters::new(Quality::Filtered);
    assert_eq!(parameters.anisotropy, 4.0);
    assert_eq!(parameters.min_filter(), FilterMode::LinearMipmapLinear);
    assert_eq!(parameters.mag_filter(), FilterMode::Linear);
}

#[test]
fn target_falls_back_only_when_unset() {
    let mut parameters = TextureParameters::default();
    assert_eq!(parameters.target_or(Target::Texture2D), Target::Texture2D);
    parameters.target = Some(Target::Texture3D);
    assert_eq!(parameters.target_or(Target::Texture2D), Target::Texture3D);
}

#[test]
fn resize_only_reallocates_on_change() {
    let backend = RecordingBackend::desktop();
    let recording = backend.recording();
    let mut manager = TextureManager::new(share(backend));
    let texture = manager.allocate(TextureParameters::new(Quality::Linear), None);

    {
        let mut binding = manager.bind(&texture);
        binding.resize([256, 256, 1], Format::Rgba, DataType::UnsignedByte);
        binding.resize([256, 256, 1], Format::Rgba, DataType::UnsignedByte);
    }
    assert_eq!(recording.uploads().len(), 1);

    manager
        .bind(&texture)
        .resize([512, 256, 1], Format::Rgba, DataType::UnsignedByte);
    assert_eq!(recording.uploads().len(), 2);
    assert_eq!(recording.storage(texture.handle()), Some([512, 256, 1]));
}

/// Volume data goes through the 3D entry point with all three extents.
#[test]
fn volume_upload() {
    let backend = RecordingBackend::desktop();
    let recording = backend.recording();
    let config = ManagerConfig {
        handle_batch_size: 4,
        ..Default::default()
    };
    let mut manager = TextureManager::with_config(share(backend), config);

    let parameters = TextureParameters {
        target: Some(Target::Texture3D),
        generate_mipmaps: false,
        ..TextureParameters::new(Quality::Linear)
    };
    let pixels = OwnedPixelBuffer::zeroed(ChannelLayout::A, ElementType::Float, vec![4, 4, 4]);
    let texture = manager.allocate(parameters, Some(&pixels));

    assert_eq!(texture.target(), Target::Texture3D);
    assert_eq!(texture.size(), [4, 4, 4]);
    assert_eq!(recording.bound(0, Target::Texture3D), Some(texture.handle()));
    assert!(matches!(
        recording.uploads()[..],
        [Call::TexImage {
            target: Target::Texture3D,
            data_type: DataType::Float,
            ..
        }]
    ));
}

/// Extents beyond the third are ignored.
#[test]
fn extra_dimensions_are_truncated() {
    let backend = RecordingBackend::desktop();
    let recording = backend.recording();
    let mut manager = TextureManager::new(share(backend));
    let parameters = TextureParameters {
        target: Some(Target::Texture3D),
        ..Default::default()
    };
    let pixels = OwnedPixelBuffer::zeroed(ChannelLayout::RGB, ElementType::Byte, vec![2, 2, 2, 1]);
    let texture = manager.allocate(parameters, Some(&pixels));
    assert_eq!(texture.size(), [2, 2, 2]);
    assert_eq!(recording.uploads().len(), 1);
}

#[test]
fn unit_past_the_end_is_fatal() {
    let mut manager = TextureManager::new(share(RecordingBackend::mobile()));
    let texture = manager.allocate(TextureParameters::default(), None);
    let unit_count = manager.unit_count();
    assert_eq!(
        fatal(|| manager.bind_unit(unit_count, &texture)),
        FatalError::UnitOutOfRange {
            unit: unit_count,
            unit_count
        }
    );
}

/// Mobile backends have no 3D textures.
#[test]
fn unsupported_target_is_fatal() {
    let config = ManagerConfig {
        error_checking: texture_units::backend::ErrorChecking::Never,
        ..Default::default()
    };
    let mut manager = TextureManager::with_config(share(RecordingBackend::mobile()), config);
    let parameters = TextureParameters {
        target: Some(Target::Texture3D),
        ..Default::default()
    };
    let texture = manager.allocate(parameters, None);
    assert_eq!(
        fatal(|| manager
            .bind(&texture)
            .resize([2, 2, 2], Format::Rgba, DataType::UnsignedByte)),
        FatalError::InvalidTarget(Target::Texture3D)
    );
    assert_eq!(texture.size(), [0, 0, 0]);
}

#[test]
fn backend_errors_are_fatal_when_checked() {
    let backend = RecordingBackend::desktop();
    let recording = backend.recording();
    let config = ManagerConfig {
        error_checking: texture_units::backend::ErrorChecking::Always,
        ..Default::default()
    };
    let mut manager = TextureManager::with_config(share(backend), config);
    let texture = manager.allocate(TextureParameters::default(), None);

    recording.inject_error(texture_units::backend::INVALID_OPERATION);
    let error = fatal(|| manager.bind_unit(0, &texture));
    assert!(matches!(error, FatalError::Backend(e) if e.code == texture_units::backend::INVALID_OPERATION));
}

/// Dropping everything returns every handle to the backend.
#[test]
fn no_handles_leak() {
    let backend = RecordingBackend::desktop();
    let recording = backend.recording();
    {
        let mut manager = TextureManager::new(share(backend));
        let pixels = OwnedPixelBuffer::zeroed(ChannelLayout::RGBA, ElementType::Byte, vec![8, 8]);
        let textures: Vec<_> = (0..10)
            .map(|_| manager.allocate(TextureParameters::new(Quality::Filtered), Some(&pixels)))
            .collect();
        assert_eq!(recording.live_handles(), 64);
        drop(textures);
        assert_eq!(recording.live_handles(), 54);
    }
    assert_eq!(recording.live_handles(), 0);
}
