//! Names of the Composer autoload files this crate reads and writes.

/// The bootstrap, directly inside the vendor directory.
pub const AUTOLOAD_PHP: &str = "autoload.php";

/// Ordered list of files to include, inside the target directory.
pub const AUTOLOAD_FILES_PHP: &str = "autoload_files.php";

/// Static class-loader registry, inside the target directory.
pub const AUTOLOAD_STATIC_PHP: &str = "autoload_static.php";

/// PSR-0 prefixes, inside the target directory.
pub const AUTOLOAD_NAMESPACES_PHP: &str = "autoload_namespaces.php";

/// PSR-4 prefixes, inside the target directory.
pub const AUTOLOAD_PSR4_PHP: &str = "autoload_psr4.php";

/// Class map, inside the target directory.
pub const AUTOLOAD_CLASSMAP_PHP: &str = "autoload_classmap.php";
