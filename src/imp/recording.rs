// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! A headless backend.
//!
//! [`RecordingBackend`] performs no GPU work.  It simulates the state a unit-indexed API keeps
//! (live handles, the active unit, per-unit bindings, storage size per texture) and records every
//! call it receives.  The [`Recording`] handle stays with the caller after the backend has been
//! shared, so calls can be counted and state inspected from outside.
//!
//! Misuse the real API would report, such as uploading with nothing bound or supplying the wrong
//! amount of pixel data, is pushed onto the simulated error queue.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::rc::Rc;

use crate::backend::{
    Backend, BackendError, Capabilities, DataType, FilterMode, Format, Target, TextureHandle,
    WrapAxis, WrapMode,
};

pub const INVALID_ENUM: u32 = 0x0500;
pub const INVALID_VALUE: u32 = 0x0501;
pub const INVALID_OPERATION: u32 = 0x0502;

/// One backend call, as received.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    GenTextures { count: usize },
    DeleteTextures(Vec<TextureHandle>),
    ActiveTexture(usize),
    BindTexture { target: Target, handle: TextureHandle },
    SetWrap { target: Target, axis: WrapAxis, mode: WrapMode },
    SetMinFilter { target: Target, filter: FilterMode },
    SetMagFilter { target: Target, filter: FilterMode },
    SetMaxAnisotropy { target: Target, anisotropy: f32 },
    TexImage {
        target: Target,
        internal_format: Format,
        size: [u32; 3],
        format: Format,
        data_type: DataType,
        /// Whether pixel data was supplied.
        initialized: bool,
    },
    GenerateMipmap(Target),
}

impl Call {
    pub fn is_upload(&self) -> bool {
        matches!(self, Call::TexImage { .. })
    }
}

#[derive(Debug, Default)]
struct RecordingState {
    calls: Vec<Call>,
    active_unit: usize,
    bindings: HashMap<(usize, Target), TextureHandle>,
    live: HashSet<TextureHandle>,
    storage: HashMap<TextureHandle, [u32; 3]>,
    errors: VecDeque<BackendError>,
}

impl RecordingState {
    fn error(&mut self, code: u32) {
        self.errors.push_back(BackendError { code });
    }

    fn bound(&self, target: Target) -> Option<TextureHandle> {
        self.bindings.get(&(self.active_unit, target)).copied()
    }
}

/// Inspection handle for a [`RecordingBackend`].
#[derive(Debug, Clone)]
pub struct Recording(Rc<RefCell<RecordingState>>);

impl Recording {
    /// Every call received so far, oldest first.
    pub fn calls(&self) -> Vec<Call> {
        self.0.borrow().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.0.borrow().calls.len()
    }

    /// Number of recorded calls matching `predicate`.
    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.0.borrow().calls.iter().filter(|c| predicate(c)).count()
    }

    pub fn uploads(&self) -> Vec<Call> {
        self.0
            .borrow()
            .calls
            .iter()
            .filter(|c| c.is_upload())
            .cloned()
            .collect()
    }

    /// Forgets recorded calls.  Simulated state is kept.
    pub fn clear(&self) {
        self.0.borrow_mut().calls.clear();
    }

    /// The texture the backend currently has bound to `target` on `unit`.
    pub fn bound(&self, unit: usize, target: Target) -> Option<TextureHandle> {
        self.0.borrow().bindings.get(&(unit, target)).copied()
    }

    pub fn active_unit(&self) -> usize {
        self.0.borrow().active_unit
    }

    /// Handles minted and not yet deleted.
    pub fn live_handles(&self) -> usize {
        self.0.borrow().live.len()
    }

    pub fn is_live(&self, handle: TextureHandle) -> bool {
        self.0.borrow().live.contains(&handle)
    }

    /// Size of the storage last allocated for `handle`.
    pub fn storage(&self, handle: TextureHandle) -> Option<[u32; 3]> {
        self.0.borrow().storage.get(&handle).copied()
    }

    /// Queues an error as if the backend had reported it.
    pub fn inject_error(&self, code: u32) {
        self.0.borrow_mut().error(code);
    }

    /// Changes the binding of `unit` without going through any manager, as foreign code
    /// sharing the context would.
    pub fn rebind_behind_the_scenes(&self, unit: usize, target: Target, handle: TextureHandle) {
        self.0.borrow_mut().bindings.insert((unit, target), handle);
    }
}

/// See the module documentation.
#[derive(Debug)]
pub struct RecordingBackend {
    capabilities: Capabilities,
    unit_count: usize,
    next_handle: u32,
    state: Rc<RefCell<RecordingState>>,
}

impl RecordingBackend {
    pub fn new(capabilities: Capabilities, unit_count: usize) -> Self {
        RecordingBackend {
            capabilities,
            unit_count,
            // 0 is never a texture name
            next_handle: 1,
            state: Rc::new(RefCell::new(RecordingState::default())),
        }
    }

    /// A desktop-tier backend with 16 units.
    pub fn desktop() -> Self {
        Self::new(Capabilities::desktop(), 16)
    }

    /// A mobile-tier backend with 8 units.
    pub fn mobile() -> Self {
        Self::new(Capabilities::mobile(), 8)
    }

    pub fn recording(&self) -> Recording {
        Recording(self.state.clone())
    }

    fn upload(
        &mut self,
        target: Target,
        internal_format: Format,
        size: [u32; 3],
        format: Format,
        data_type: DataType,
        pixels: Option<&[u8]>,
    ) {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::TexImage {
            target,
            internal_format,
            size,
            format,
            data_type,
            initialized: pixels.is_some(),
        });
        if !self.capabilities.supports_target(target) {
            state.error(INVALID_ENUM);
            return;
        }
        let Some(handle) = state.bound(target) else {
            state.error(INVALID_OPERATION);
            return;
        };
        if let Some(pixels) = pixels {
            let expected = size
                .iter()
                .try_fold(format.channels() * data_type.size(), |len, &s| {
                    len.checked_mul(s as usize)
                });
            if expected.is_none_or(|expected| pixels.len() < expected) {
                state.error(INVALID_VALUE);
                return;
            }
        }
        state.storage.insert(handle, size);
    }
}

impl Backend for RecordingBackend {
    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn max_combined_texture_units(&self) -> usize {
        self.unit_count
    }

    fn gen_textures(&mut self, count: usize) -> Vec<TextureHandle> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::GenTextures { count });
        let handles: Vec<TextureHandle> = (self.next_handle..self.next_handle + count as u32)
            .map(TextureHandle)
            .collect();
        self.next_handle += count as u32;
        state.live.extend(handles.iter().copied());
        handles
    }

    fn delete_textures(&mut self, handles: &[TextureHandle]) {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::DeleteTextures(handles.to_vec()));
        for handle in handles {
            state.live.remove(handle);
            state.storage.remove(handle);
            // deleting a bound texture reverts the binding
            state.bindings.retain(|_, bound| bound != handle);
        }
    }

    fn active_texture(&mut self, unit: usize) {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::ActiveTexture(unit));
        if unit >= self.unit_count {
            state.error(INVALID_ENUM);
            return;
        }
        state.active_unit = unit;
    }

    fn bind_texture(&mut self, target: Target, handle: TextureHandle) {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::BindTexture { target, handle });
        if !self.capabilities.supports_target(target) {
            state.error(INVALID_ENUM);
            return;
        }
        let unit = state.active_unit;
        state.bindings.insert((unit, target), handle);
    }

    fn set_wrap(&mut self, target: Target, axis: WrapAxis, mode: WrapMode) {
        self.state
            .borrow_mut()
            .calls
            .push(Call::SetWrap { target, axis, mode });
    }

    fn set_min_filter(&mut self, target: Target, filter: FilterMode) {
        self.state
            .borrow_mut()
            .calls
            .push(Call::SetMinFilter { target, filter });
    }

    fn set_mag_filter(&mut self, target: Target, filter: FilterMode) {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::SetMagFilter { target, filter });
        // magnification never uses mipmaps
        if !matches!(filter, FilterMode::Nearest | FilterMode::Linear) {
            state.error(INVALID_ENUM);
        }
    }

    fn set_max_anisotropy(&mut self, target: Target, anisotropy: f32) {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::SetMaxAnisotropy { target, anisotropy });
        if !self.capabilities.anisotropy {
            state.error(INVALID_ENUM);
        }
    }

    fn tex_image_1d(
        &mut self,
        internal_format: Format,
        width: u32,
        format: Format,
        data_type: DataType,
        pixels: Option<&[u8]>,
    ) {
        self.upload(
            Target::Texture1D,
            internal_format,
            [width, 1, 1],
            format,
            data_type,
            pixels,
        );
    }

    fn tex_image_2d(
        &mut self,
        internal_format: Format,
        width: u32,
        height: u32,
        format: Format,
        data_type: DataType,
        pixels: Option<&[u8]>,
    ) {
        self.upload(
            Target::Texture2D,
            internal_format,
            [width, height, 1],
            format,
            data_type,
            pixels,
        );
    }

    fn tex_image_3d(
        &mut self,
        internal_format: Format,
        size: [u32; 3],
        format: Format,
        data_type: DataType,
        pixels: Option<&[u8]>,
    ) {
        self.upload(
            Target::Texture3D,
            internal_format,
            size,
            format,
            data_type,
            pixels,
        );
    }

    fn generate_mipmap(&mut self, target: Target) {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::GenerateMipmap(target));
        if state.bound(target).is_none() {
            state.error(INVALID_OPERATION);
        }
    }

    fn poll_error(&mut self) -> Option<BackendError> {
        self.state.borrow_mut().errors.pop_front()
    }
}
