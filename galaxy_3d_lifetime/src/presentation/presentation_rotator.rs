/// Presentable image rotation
///
/// A swapchain hands back images in an order only the presentation engine
/// knows, and a binary semaphore passed to an acquire cannot be reused until
/// the submission waiting on it has been issued. The rotator keeps one acquire
/// and one present semaphore per image, picks a free acquire semaphore before
/// each acquire, and then moves it into the slot of the image the engine
/// actually returned.

use std::time::Duration;
use crate::device::{PresentationEngine, PresentStatus};
use crate::error::{Error, Result};
use crate::{engine_debug, engine_error, engine_warn};
use super::sync_primitive::BinarySemaphore;

/// Upper bound on presentable images per surface
pub const MAX_PRESENTABLE_IMAGES: usize = 8;

/// Images of one presentation engine plus their paired semaphores
///
/// `images`, `acquire_semaphores` and `present_semaphores` are parallel:
/// entry `i` of each belongs to image index `i` once that image has been
/// acquired.
///
/// # Frame protocol
///
/// ```ignore
/// let index = rotator.acquire_image(config.acquire_timeout)?;
/// // submit: wait on rotator.acquire_semaphore(index), signal rotator.present_semaphore(index)
/// rotator.record_submit(index)?;
/// rotator.present(index)?;
/// ```
pub struct PresentationRotator<E: PresentationEngine> {
    engine: E,
    images: Vec<E::Image>,
    acquire_semaphores: Vec<BinarySemaphore<E::Semaphore>>,
    present_semaphores: Vec<BinarySemaphore<E::Semaphore>>,
    last_index: usize,
    suboptimal: bool,
}

impl<E: PresentationEngine> PresentationRotator<E> {
    /// Take the engine's current images and create two semaphores per image
    ///
    /// # Errors
    ///
    /// - `Error::InitializationFailed` if the engine has no images or more
    ///   than `MAX_PRESENTABLE_IMAGES`
    /// - any error from semaphore creation (already created semaphores are
    ///   destroyed)
    pub fn new(engine: E) -> Result<Self> {
        let images = engine.images();
        check_image_count(images.len())?;

        let mut rotator = Self {
            engine,
            images,
            acquire_semaphores: Vec::new(),
            present_semaphores: Vec::new(),
            last_index: 0,
            suboptimal: false,
        };
        // On failure the rotator drops and destroys what was created
        rotator.resize_semaphores()?;
        rotator.last_index = rotator.images.len() - 1;

        engine_debug!("galaxy3d::PresentationRotator",
            "Created presentation rotator with {} images", rotator.images.len());

        Ok(rotator)
    }

    /// Acquire the next presentable image and return its index
    ///
    /// On success the acquire semaphore of the returned index is signaled
    /// and must be waited on by the frame's submission.
    ///
    /// # Errors
    ///
    /// - `Error::UnexpectedState` if every acquire semaphore is still
    ///   signaled (images acquired without a matching `record_submit`)
    /// - `Error::Timeout`, `Error::NotReady`: nothing acquired, retry later
    /// - `Error::OutOfDate`: recreate the swapchain, then call `rebuild`
    /// - `Error::DeviceLost`
    pub fn acquire_image(&mut self, timeout: Duration) -> Result<u32> {
        let count = self.images.len();
        let start = (self.last_index + 1) % count;

        let Some(probe) = (0..count)
            .map(|offset| (start + offset) % count)
            .find(|&i| self.acquire_semaphores[i].is_waited())
        else {
            engine_error!("galaxy3d::PresentationRotator",
                "No free acquire semaphore: all {} are pending a submit", count);
            return Err(Error::UnexpectedState(format!(
                "all {} acquire semaphores are signaled", count
            )));
        };

        let acquired = match self
            .engine
            .acquire_next_image(timeout, self.acquire_semaphores[probe].handle())
        {
            Ok(acquired) => acquired,
            Err(e) => {
                match e {
                    Error::Timeout | Error::NotReady => {
                        engine_debug!("galaxy3d::PresentationRotator", "Acquire returned without an image: {}", e);
                    }
                    Error::OutOfDate => {
                        engine_debug!("galaxy3d::PresentationRotator", "Swapchain out of date on acquire");
                    }
                    Error::DeviceLost => {
                        engine_error!("galaxy3d::PresentationRotator", "Device lost during acquire");
                    }
                    _ => {
                        engine_error!("galaxy3d::PresentationRotator", "Acquire failed: {}", e);
                    }
                }
                return Err(e);
            }
        };

        let index = acquired.index as usize;
        if index >= count {
            engine_error!("galaxy3d::PresentationRotator",
                "Engine returned image {} but only {} images exist", index, count);
            return Err(Error::UnexpectedState(format!(
                "acquired image index {} out of range ({} images)", index, count
            )));
        }

        self.acquire_semaphores[probe].signal();
        self.acquire_semaphores.swap(probe, index);
        self.present_semaphores.swap(probe, index);

        self.last_index = index;
        if acquired.suboptimal && !self.suboptimal {
            engine_warn!("galaxy3d::PresentationRotator", "Swapchain is suboptimal");
        }
        self.suboptimal = acquired.suboptimal;

        Ok(acquired.index)
    }

    /// Record that a submission waiting on the acquire semaphore of `index`
    /// and signaling its present semaphore was issued
    ///
    /// # Errors
    ///
    /// Returns `Error::UnexpectedState` if `index` is out of range.
    pub fn record_submit(&mut self, index: u32) -> Result<()> {
        let slot = self.slot(index)?;
        self.acquire_semaphores[slot].wait();
        self.present_semaphores[slot].signal();
        Ok(())
    }

    /// Present image `index` once its present semaphore is signaled
    ///
    /// The present semaphore is consumed even when the swapchain turns out to
    /// be out of date.
    ///
    /// # Errors
    ///
    /// - `Error::UnexpectedState` if `index` is out of range
    /// - `Error::OutOfDate`: recreate the swapchain, then call `rebuild`
    /// - `Error::DeviceLost` or a backend error
    pub fn present(&mut self, index: u32) -> Result<PresentStatus> {
        let slot = self.slot(index)?;
        let result = self.engine.present(index, self.present_semaphores[slot].handle());

        match result {
            Ok(status) => {
                self.present_semaphores[slot].wait();
                self.suboptimal = status == PresentStatus::Suboptimal;
                Ok(status)
            }
            Err(Error::OutOfDate) => {
                self.present_semaphores[slot].wait();
                engine_debug!("galaxy3d::PresentationRotator", "Swapchain out of date on present");
                Err(Error::OutOfDate)
            }
            Err(e) => {
                engine_error!("galaxy3d::PresentationRotator", "Present of image {} failed: {}", index, e);
                Err(e)
            }
        }
    }

    /// Re-read the engine's images after the swapchain was recreated through
    /// [`engine_mut`](Self::engine_mut)
    ///
    /// Semaphores are kept and created or destroyed to match the new image
    /// count.
    ///
    /// # Errors
    ///
    /// - `Error::UnexpectedState` if any semaphore is still signaled (the
    ///   device may still wait on it)
    /// - `Error::InitializationFailed` for an invalid image count
    pub fn rebuild(&mut self) -> Result<()> {
        let busy = self
            .acquire_semaphores
            .iter()
            .chain(self.present_semaphores.iter())
            .filter(|s| s.is_signaled())
            .count();
        if busy > 0 {
            engine_error!("galaxy3d::PresentationRotator",
                "Cannot rebuild: {} semaphores are still signaled", busy);
            return Err(Error::UnexpectedState(format!(
                "{} semaphores still signaled during rebuild", busy
            )));
        }

        let images = self.engine.images();
        check_image_count(images.len())?;
        self.images = images;
        self.resize_semaphores()?;
        self.last_index = self.images.len() - 1;
        self.suboptimal = false;

        engine_debug!("galaxy3d::PresentationRotator",
            "Rebuilt presentation rotator with {} images", self.images.len());
        Ok(())
    }

    /// Image at `index`
    pub fn image(&self, index: u32) -> Option<&E::Image> {
        self.images.get(index as usize)
    }

    pub fn image_count(&self) -> u32 {
        self.images.len() as u32
    }

    /// Most recently acquired index (`image_count() - 1` before the first acquire)
    pub fn last_index(&self) -> u32 {
        self.last_index as u32
    }

    /// Whether the last acquire or present reported a suboptimal swapchain
    pub fn is_suboptimal(&self) -> bool {
        self.suboptimal
    }

    /// Semaphore the frame rendering image `index` must wait on
    pub fn acquire_semaphore(&self, index: u32) -> Option<&BinarySemaphore<E::Semaphore>> {
        self.acquire_semaphores.get(index as usize)
    }

    /// Semaphore the frame rendering image `index` must signal
    pub fn present_semaphore(&self, index: u32) -> Option<&BinarySemaphore<E::Semaphore>> {
        self.present_semaphores.get(index as usize)
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    fn slot(&self, index: u32) -> Result<usize> {
        let slot = index as usize;
        if slot >= self.images.len() {
            engine_error!("galaxy3d::PresentationRotator",
                "Image index {} out of range ({} images)", index, self.images.len());
            return Err(Error::UnexpectedState(format!(
                "image index {} out of range ({} images)", index, self.images.len()
            )));
        }
        Ok(slot)
    }

    /// Create or destroy semaphores until there are two per image
    fn resize_semaphores(&mut self) -> Result<()> {
        let count = self.images.len();

        while self.acquire_semaphores.len() > count {
            if let Some(semaphore) = self.acquire_semaphores.pop() {
                self.engine.destroy_semaphore(semaphore.into_handle());
            }
        }
        while self.present_semaphores.len() > count {
            if let Some(semaphore) = self.present_semaphores.pop() {
                self.engine.destroy_semaphore(semaphore.into_handle());
            }
        }

        while self.acquire_semaphores.len() < count {
            let semaphore = self.engine.create_semaphore()?;
            self.acquire_semaphores.push(BinarySemaphore::new(semaphore));
        }
        while self.present_semaphores.len() < count {
            let semaphore = self.engine.create_semaphore()?;
            self.present_semaphores.push(BinarySemaphore::new(semaphore));
        }
        Ok(())
    }
}

impl<E: PresentationEngine> Drop for PresentationRotator<E> {
    fn drop(&mut self) {
        for semaphore in self.acquire_semaphores.drain(..).chain(self.present_semaphores.drain(..)) {
            self.engine.destroy_semaphore(semaphore.into_handle());
        }
    }
}

fn check_image_count(count: usize) -> Result<()> {
    if count == 0 || count > MAX_PRESENTABLE_IMAGES {
        engine_error!("galaxy3d::PresentationRotator",
            "Presentation engine has {} images (expected 1..={})", count, MAX_PRESENTABLE_IMAGES);
        return Err(Error::InitializationFailed(format!(
            "{} presentable images (expected 1..={})", count, MAX_PRESENTABLE_IMAGES
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "presentation_rotator_tests.rs"]
mod tests;
