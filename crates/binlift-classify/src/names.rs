//! Fixed name tables
//!
//! The vocabulary the classifier matches against: canonical entry points,
//! standard-library and OS-API names, compiler/runtime prefixes, and C++
//! template-library substrings that mark instantiated container noise.
//! All matching is case-insensitive; callers pass lowercased names.

use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Canonical entry points. Always retained, regardless of size or flags.
pub const ENTRY_POINTS: &[&str] = &["main", "_main", "wmain", "winmain"];

/// Single-underscore names allowed through the leading-marker rule as
/// entry point variants.
pub const ENTRY_VARIANTS: &[&str] = &["_main", "_wmain", "_start", "_winmain"];

/// Prefixes of auto-generated names assigned by the decompiler when no
/// symbol is available.
pub const AUTO_NAME_PREFIXES: &[&str] = &["fun_", "sub_", "lab_", "dat_"];

/// Standard-library, OS-API, and runtime-startup names. Exact matches are
/// never user code.
pub const LIBRARY_NAMES: &[&str] = &[
    // libc
    "printf", "fprintf", "sprintf", "snprintf", "scanf", "sscanf", "puts",
    "putchar", "getchar", "gets", "fgets", "fputs", "malloc", "calloc",
    "realloc", "free", "memcpy", "memmove", "memset", "memcmp", "strlen",
    "strcpy", "strncpy", "strcat", "strncat", "strcmp", "strncmp", "strchr",
    "strstr", "strtol", "atoi", "atol", "exit", "abort", "atexit", "fopen",
    "fclose", "fread", "fwrite", "fseek", "ftell", "fflush", "qsort",
    "bsearch", "rand", "srand", "time", "clock", "signal", "raise", "setjmp",
    "longjmp",
    // win32
    "createfilew", "createfilea", "readfile", "writefile", "closehandle",
    "getprocaddress", "loadlibrarya", "loadlibraryw", "virtualalloc",
    "virtualfree", "virtualprotect", "exitprocess", "getmodulehandlea",
    "getmodulehandlew", "messageboxa", "messageboxw", "getlasterror",
    "heapalloc", "heapfree", "getstdhandle", "writeconsolea",
    // runtime startup
    "_initterm", "_initterm_e", "__libc_start_main", "__libc_csu_init",
    "__libc_csu_fini", "_dllmaincrtstartup", "register_tm_clones",
    "deregister_tm_clones", "frame_dummy", "__do_global_dtors_aux",
    "__do_global_ctors_aux", "_init", "_fini", "_setargv", "_matherr",
];

/// Lookup set over [`LIBRARY_NAMES`].
pub static LIBRARY_NAME_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| LIBRARY_NAMES.iter().copied().collect());

/// Compiler/runtime internal prefixes. Anything under these belongs to the
/// CRT, STL internals, or security machinery.
pub const RUNTIME_PREFIXES: &[&str] = &[
    "__security", "__scrt", "__crt", "__acrt", "__vcrt", "__isa", "__chkstk",
    "__report", "__guard", "__cxa", "__gxx", "__gnu", "__stack_chk",
    "_cnd_", "_mtx_", "_thrd_", "_xtime_", "std::_", "operator.new",
    "operator.delete",
];

/// Substrings marking CRT entry plumbing even without a known prefix.
pub const CRT_ENTRY_SUBSTRINGS: &[&str] = &[
    "crtstartup", "scrt_common_main", "initterm", "seh_filter",
    "security_check_cookie", "security_init_cookie", "tm_clones",
    "frame_dummy", "do_global_",
];

/// C++ template-library vocabulary. Instantiated containers/iterators/
/// allocators show up as huge mangled-ish names (and, post-decompilation,
/// inside the body text) but carry no user logic worth refining.
pub const TEMPLATE_VOCAB: &[&str] = &[
    "basic_string", "char_traits", "allocator", "_tree", "_hash",
    "_rb_tree", "hashtable", "_deque", "_vector_base", "iterator",
    "shared_ptr", "unique_ptr", "weak_ptr", "_list_node", "emplace",
    "_construct", "_destroy", "_uninitialized", "lexicographical",
];
