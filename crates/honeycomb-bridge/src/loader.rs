//! Dynamic loading of a module implementing the other side of the boundary.

use std::ffi::OsStr;
use std::path::Path;

use libloading::{Library, Symbol};
use thiserror::Error;

use honeycomb_capi::{honey_api_version_t, honey_create_app_t, API_VERSION};

use crate::base::RefPtr;
use crate::ctocpp::app::AppCToCpp;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to load bridge module: {0}")]
    Library(#[from] libloading::Error),
    #[error("module reports API version {found}, this build supports {expected}")]
    Version { expected: i32, found: i32 },
}

/// A loaded bridge module. Keeps the library mapped for as long as any
/// object obtained from it may live.
#[derive(Debug)]
pub struct Module {
    lib: Library,
}

impl Module {
    /// Loads the module at `path` and checks its reported API version.
    ///
    /// Struct-size gating already tolerates member-level skew; the version
    /// check only rejects modules built against an incompatible ABI.
    ///
    /// # Safety
    ///
    /// Loading a library executes its initialization code.
    pub unsafe fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let lib = Library::new(OsStr::new(path))?;
        let api_version: Symbol<honey_api_version_t> = lib.get(b"honey_api_version\0")?;
        let found = api_version();
        if found != API_VERSION {
            return Err(LoadError::Version {
                expected: API_VERSION,
                found,
            });
        }
        log::debug!("loaded bridge module {} (api v{found})", path.display());
        Ok(Self { lib })
    }

    /// Asks the module for its app instance. Returns `None` if the module
    /// declines to provide one.
    ///
    /// # Safety
    ///
    /// Calls into module code.
    pub unsafe fn create_app(&self) -> Result<Option<RefPtr<AppCToCpp>>, LoadError> {
        let create_app: Symbol<honey_create_app_t> = self.lib.get(b"honey_create_app\0")?;
        Ok(AppCToCpp::wrap(create_app()))
    }
}
