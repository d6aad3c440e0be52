//! Loaded shared objects
//!
//! The dynamic loader keeps running totals of objects mapped into and
//! unmapped from the process; those stand in for loaded units of code.

use crate::collector::CollectContext;
#[cfg(not(target_os = "linux"))]
use crate::error::SourceError;
use crate::error::SourceResult;
use crate::properties::Properties;

/// Counts reported by one walk over the loaded objects
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedObjects {
    /// Objects currently mapped, the executable included
    pub names: Vec<String>,
    /// Objects mapped since startup
    pub adds: u64,
    /// Objects unmapped since startup
    pub subs: u64,
}

impl LoadedObjects {
    pub fn loaded(&self) -> usize {
        self.names.len()
    }
}

/// Gather `classLoading.*` entries
#[cfg(target_os = "linux")]
pub fn collect(_ctx: &CollectContext, props: &mut Properties) -> SourceResult<()> {
    let objects = linux::loaded_objects()?;
    put_objects(props, objects);
    Ok(())
}

#[cfg(not(target_os = "linux"))]
pub fn collect(_ctx: &CollectContext, _props: &mut Properties) -> SourceResult<()> {
    Err(SourceError::Unsupported(
        "loaded object enumeration needs dl_iterate_phdr".to_string(),
    ))
}

fn put_objects(props: &mut Properties, objects: LoadedObjects) {
    props.put("classLoading.loadedClassCount", objects.loaded());
    props.put("classLoading.totalLoadedClassCount", objects.adds);
    props.put("classLoading.unloadedClassCount", objects.subs);
    props.put("classLoading.objects", objects.names);
}

#[cfg(target_os = "linux")]
mod linux {
    use std::ffi::CStr;
    use std::os::raw::{c_int, c_void};

    use super::LoadedObjects;
    use crate::error::{SourceError, SourceResult};

    unsafe extern "C" fn visit(
        info: *mut libc::dl_phdr_info,
        _size: libc::size_t,
        data: *mut c_void,
    ) -> c_int {
        // SAFETY: `data` is the `LoadedObjects` passed to dl_iterate_phdr
        // below and `info` is valid for the duration of this callback.
        let objects = &mut *(data as *mut LoadedObjects);
        let info = &*info;
        let name = if info.dlpi_name.is_null() {
            String::new()
        } else {
            CStr::from_ptr(info.dlpi_name).to_string_lossy().into_owned()
        };
        objects.names.push(if name.is_empty() {
            "[main]".to_string()
        } else {
            name
        });
        objects.adds = info.dlpi_adds as u64;
        objects.subs = info.dlpi_subs as u64;
        0
    }

    pub fn loaded_objects() -> SourceResult<LoadedObjects> {
        let mut objects = LoadedObjects::default();
        // SAFETY: the callback only touches `objects`, which outlives the call.
        unsafe {
            libc::dl_iterate_phdr(
                Some(visit),
                &mut objects as *mut LoadedObjects as *mut c_void,
            );
        }
        if objects.names.is_empty() {
            return Err(SourceError::Unavailable(
                "dynamic loader reported no objects".to_string(),
            ));
        }
        Ok(objects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_objects() {
        let mut props = Properties::new();
        put_objects(
            &mut props,
            LoadedObjects {
                names: vec!["[main]".to_string(), "/lib/libc.so.6".to_string()],
                adds: 3,
                subs: 1,
            },
        );

        assert_eq!(
            props.get("classLoading.loadedClassCount").unwrap().normalize(),
            "2"
        );
        assert_eq!(
            props.get("classLoading.totalLoadedClassCount").unwrap().normalize(),
            "3"
        );
        assert_eq!(
            props.get("classLoading.unloadedClassCount").unwrap().normalize(),
            "1"
        );
        assert_eq!(
            props.get("classLoading.objects").unwrap().normalize(),
            "[[main], /lib/libc.so.6]"
        );
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_live_objects_include_main() {
        let objects = linux::loaded_objects().unwrap();
        assert_eq!(objects.names[0], "[main]");
        assert!(objects.loaded() >= 1);
    }
}
