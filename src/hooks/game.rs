//! The hooked entry points of the game image.
//!
//! Three functions of the fixed executable are intercepted: the two
//! content-management queries, which are replaced outright, and the pre-frame
//! routine, which is augmented. The identities are compile-time-known
//! symbols; how calls reach the replacements is the hosting loader's
//! business, recorded here only as each binding's `hook_fn`.

use std::ffi::c_void;
use std::os::raw::{c_char, c_int, c_uint};
use std::ptr::NonNull;
use std::slice;

use color_eyre::eyre::{self, eyre};

use crate::ffi::game::{
    CellGameContentSize, GameState, CELL_GAME_DIRNAME_SIZE, CELL_GAME_PATH_MAX, CELL_OK,
};
use crate::modules::content_path::{self, FsProbe};
use crate::modules::frame_tick;
use crate::utils::*;

pub static CELL_GAME_BOOT_CHECK: Pointer<
    unsafe extern "C" fn(*mut c_uint, *mut c_uint, *mut CellGameContentSize, *mut c_char) -> c_int,
> = Pointer::empty_hooked(b"cellGameBootCheck\0", my_cellGameBootCheck as _);

pub static CELL_GAME_CONTENT_PERMIT: Pointer<
    unsafe extern "C" fn(*mut c_char, *mut c_char) -> c_int,
> = Pointer::empty_hooked(b"cellGameContentPermit\0", my_cellGameContentPermit as _);

pub static PRE_GAME_LOOP: Pointer<unsafe extern "C" fn()> =
    Pointer::empty_hooked(b"pre_game_loop\0", my_pre_game_loop as _);

/// Every binding the patch installs. One active replacement per identity;
/// all of them must resolve for initialization to succeed.
pub static HOOKS: &[&dyn PointerTrait] = &[
    &CELL_GAME_BOOT_CHECK,
    &CELL_GAME_CONTENT_PERMIT,
    &PRE_GAME_LOOP,
];

// Globals of the game image, resolved best-effort. A missing global only
// disables the accessor built on it.
pub static GAME_STATE: Variable<c_int> = Variable::empty(b"game_state\0");
pub static CURRENT_LEVEL: Variable<c_int> = Variable::empty(b"current_level\0");
pub static DESTINATION_LEVEL: Variable<c_int> = Variable::empty(b"destination_level\0");

fn open_game_image() -> Option<libloading::Library> {
    use libc::RTLD_NOW;

    // The game is the process image itself; dlopen(NULL) hands back a handle
    // to it without loading anything.
    let library = unsafe { libloading::os::unix::Library::open(None::<&str>, RTLD_NOW) };
    library.ok().map(libloading::Library::from)
}

unsafe fn resolve(library: &libloading::Library, symbol: &[u8]) -> Option<NonNull<c_void>> {
    library
        .get::<*mut c_void>(symbol)
        .ok()
        .and_then(|sym| NonNull::new(*sym))
}

/// Resolves every hooked identity in the loaded image.
///
/// The patch cannot run correctly with an interception point missing, so any
/// unresolved hook is an error; the caller aborts startup on it. Already-set
/// bindings are overwritten.
pub unsafe fn find_pointers(marker: MainThreadMarker) -> eyre::Result<()> {
    let library =
        open_game_image().ok_or_else(|| eyre!("could not open a handle to the game image"))?;

    for pointer in HOOKS {
        match resolve(&library, pointer.symbol()) {
            Some(ptr) => pointer.set(marker, Some(ptr)),
            None => {
                reset_pointers(marker);
                return Err(eyre!("could not find {} in the game image", pointer.name()));
            }
        }
        pointer.log(marker);
    }

    for variable in [&GAME_STATE, &CURRENT_LEVEL, &DESTINATION_LEVEL] {
        variable.set(marker, resolve(&library, variable.symbol()));
        if variable.is_set(marker) {
            debug!("{} found", variable.name());
        } else {
            debug!("{} was not found", variable.name());
        }
    }

    Ok(())
}

/// Resets every binding. Declared for shutdown symmetry; no handler runs
/// afterwards.
pub fn reset_pointers(marker: MainThreadMarker) {
    for pointer in HOOKS {
        pointer.reset(marker);
    }

    GAME_STATE.reset(marker);
    CURRENT_LEVEL.reset(marker);
    DESTINATION_LEVEL.reset(marker);
}

/// Returns the game's state machine position, if the global was found.
pub fn game_state(marker: MainThreadMarker) -> Option<GameState> {
    let ptr = GAME_STATE.get_opt(marker)?;
    // Safety: the global lives in the game image for the whole process
    // lifetime and is only written by the main thread.
    GameState::from_raw(unsafe { *ptr })
}

/// Returns the level the game is currently on, if the global was found.
pub fn current_level(marker: MainThreadMarker) -> Option<c_int> {
    let ptr = CURRENT_LEVEL.get_opt(marker)?;
    // Safety: same as game_state().
    Some(unsafe { *ptr })
}

/// Returns the level the game is loading towards, if the global was found.
pub fn destination_level(marker: MainThreadMarker) -> Option<c_int> {
    let ptr = DESTINATION_LEVEL.get_opt(marker)?;
    // Safety: same as game_state().
    Some(unsafe { *ptr })
}

/// Replacement for the content-metadata query.
///
/// Fully replaces the original: every output is written on every call, and
/// the original is never consulted. The output capacities are the documented
/// cellGame contract; they are not passed at runtime.
unsafe extern "C" fn my_cellGameBootCheck(
    r#type: *mut c_uint,
    attributes: *mut c_uint,
    size: *mut CellGameContentSize,
    dir_name: *mut c_char,
) -> c_int {
    abort_on_panic(move || {
        let _marker = MainThreadMarker::new();

        debug!(
            "cellGameBootCheck({:p}, {:p}, {:p}, {:p})",
            r#type, attributes, size, dir_name
        );

        let info = content_path::boot_check_info(&FsProbe);

        *r#type = info.content_type as c_uint;
        *attributes = info.attributes as c_uint;
        *size = CellGameContentSize {
            hddFreeSizeKB: info.hdd_free_size_kb,
            sizeKB: info.size_kb,
            sysSizeKB: info.sys_size_kb,
        };

        let dir_name = slice::from_raw_parts_mut(dir_name.cast::<u8>(), CELL_GAME_DIRNAME_SIZE);
        if let Err(err) = content_path::write_c_string(dir_name, info.dir_name) {
            error!("cellGameBootCheck: {err}");
        }

        debug!("cellGameBootCheck: {:?}, dirName {}", info.medium, info.dir_name);

        CELL_OK
    })
}

/// Replacement for the content-permission query.
///
/// Both paths are written from one medium decision, never a mix.
unsafe extern "C" fn my_cellGameContentPermit(
    content_info_path: *mut c_char,
    usrdir_path: *mut c_char,
) -> c_int {
    abort_on_panic(move || {
        let _marker = MainThreadMarker::new();

        debug!(
            "cellGameContentPermit({:p}, {:p})",
            content_info_path, usrdir_path
        );

        let location = content_path::content_location(&FsProbe);

        let content_info_path =
            slice::from_raw_parts_mut(content_info_path.cast::<u8>(), CELL_GAME_PATH_MAX);
        if let Err(err) = content_path::write_c_string(content_info_path, location.content_info_path)
        {
            error!("cellGameContentPermit: {err}");
        }

        let usrdir_path = slice::from_raw_parts_mut(usrdir_path.cast::<u8>(), CELL_GAME_PATH_MAX);
        if let Err(err) = content_path::write_c_string(usrdir_path, location.user_data_path) {
            error!("cellGameContentPermit: {err}");
        }

        debug!(
            "cellGameContentPermit: {:?}, {} / {}",
            location.medium, location.content_info_path, location.user_data_path
        );

        CELL_OK
    })
}

/// Augmentation of the game's pre-frame routine.
///
/// Ticks the injected subsystem exactly once, then calls the original so the
/// rest of the frame runs unmodified.
unsafe extern "C" fn my_pre_game_loop() {
    abort_on_panic(move || {
        let marker = MainThreadMarker::new();

        frame_tick::tick(marker);

        PRE_GAME_LOOP.get(marker)();
    })
}

#[cfg(test)]
mod tests {
    use std::ffi::CStr;
    use std::sync::atomic::{AtomicU64, Ordering};

    use super::*;

    #[test]
    fn hook_table_covers_the_three_interception_points() {
        assert_eq!(HOOKS.len(), 3);

        let symbols: Vec<_> = HOOKS.iter().map(|pointer| pointer.name()).collect();
        assert_eq!(
            symbols,
            ["cellGameBootCheck", "cellGameContentPermit", "pre_game_loop"]
        );

        for pointer in HOOKS {
            assert!(!pointer.hook_fn().is_null());
        }
    }

    #[test]
    fn boot_check_reply_is_fully_written() {
        let mut r#type = c_uint::MAX;
        let mut attributes = c_uint::MAX;
        let mut size = CellGameContentSize {
            hddFreeSizeKB: 0,
            sizeKB: 0,
            sysSizeKB: 0,
        };
        let mut dir_name = [0x55_u8; CELL_GAME_DIRNAME_SIZE];

        let rv = unsafe {
            my_cellGameBootCheck(
                &mut r#type,
                &mut attributes,
                &mut size,
                dir_name.as_mut_ptr().cast(),
            )
        };

        assert_eq!(rv, CELL_OK);
        assert_eq!(r#type, 2);
        assert_eq!(attributes, 0);
        assert_eq!(size.hddFreeSizeKB, 100_000);
        assert_eq!(size.sizeKB, -1);
        assert_eq!(size.sysSizeKB, 4);

        let name = CStr::from_bytes_until_nul(&dir_name).unwrap().to_str().unwrap();
        assert!(name == "NPEA00387" || name == "BCES01503");
    }

    #[test]
    fn content_permit_reply_is_one_consistent_pair() {
        let mut content_info = [0x55_u8; CELL_GAME_PATH_MAX];
        let mut usrdir = [0x55_u8; CELL_GAME_PATH_MAX];

        let rv = unsafe {
            my_cellGameContentPermit(
                content_info.as_mut_ptr().cast(),
                usrdir.as_mut_ptr().cast(),
            )
        };

        assert_eq!(rv, CELL_OK);

        let content_info = CStr::from_bytes_until_nul(&content_info)
            .unwrap()
            .to_str()
            .unwrap();
        let usrdir = CStr::from_bytes_until_nul(&usrdir).unwrap().to_str().unwrap();

        // Whichever medium the probe picked, the pair comes from one branch.
        let expected = [
            ("/dev_hdd0/game/NPEA00387", "/dev_hdd0/game/NPEA00387/USRDIR"),
            ("/dev_bdvd/PS3_GAME", "/dev_bdvd/PS3_GAME/USRDIR"),
        ];
        assert!(expected.contains(&(content_info, usrdir)));
    }

    static ORIGINAL_FRAMES: AtomicU64 = AtomicU64::new(0);

    unsafe extern "C" fn fake_pre_game_loop() {
        ORIGINAL_FRAMES.fetch_add(1, Ordering::SeqCst);
    }

    #[test]
    fn pre_game_loop_ticks_once_then_forwards() {
        unsafe {
            let marker = MainThreadMarker::new();

            PRE_GAME_LOOP.set(marker, NonNull::new(fake_pre_game_loop as *mut c_void));

            let frames_before = frame_tick::frame_count(marker);

            my_pre_game_loop();
            assert_eq!(frame_tick::frame_count(marker), frames_before + 1);
            assert_eq!(ORIGINAL_FRAMES.load(Ordering::SeqCst), 1);

            my_pre_game_loop();
            assert_eq!(frame_tick::frame_count(marker), frames_before + 2);
            assert_eq!(ORIGINAL_FRAMES.load(Ordering::SeqCst), 2);

            PRE_GAME_LOOP.reset(marker);
        }
    }

    #[test]
    fn accessors_disable_without_the_globals() {
        unsafe {
            let marker = MainThreadMarker::new();

            assert_eq!(game_state(marker), None);
            assert_eq!(current_level(marker), None);
            assert_eq!(destination_level(marker), None);
        }
    }
}
