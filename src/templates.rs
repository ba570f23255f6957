//! File templates for `cmake-init`.
//!
//! Every function here is a pure function of the project template: it renders
//! the text of one generated file and never touches the filesystem.
//!
//! ## Generated Files
//!
//! - `CMakeLists.txt` - root manifest (standards, flags, targets, tests)
//! - `lib/<name>/CMakeLists.txt` - one static library per declared library
//! - placeholder C sources and headers for executables and libraries
//! - `tests/CMakeLists.txt` + one GoogleTest source when tests are enabled

use crate::config::{ExecutableConfig, LibraryConfig, ProjectConfig};
use std::fmt::Write;

/// GoogleTest release pulled in by the generated test harness.
pub const GOOGLETEST_URL: &str = "https://github.com/google/googletest/archive/refs/tags/v1.14.0.zip";

/// Name of the generated test executable.
pub const TEST_TARGET: &str = "run_tests";

pub fn root_cmakelists(config: &ProjectConfig) -> String {
    let mut content = format!(
        r#"cmake_minimum_required(VERSION 3.10)

project({} C CXX)

if(POLICY CMP0135)
  cmake_policy(SET CMP0135 NEW)
endif()

set(CMAKE_C_STANDARD {})
set(CMAKE_CXX_STANDARD {})
set(CMAKE_C_STANDARD_REQUIRED ON)
set(CMAKE_CXX_STANDARD_REQUIRED ON)

# Set a default build type if none was specified
if(NOT CMAKE_BUILD_TYPE AND NOT CMAKE_CONFIGURATION_TYPES)
  message(STATUS "Setting build type to 'Release' as none was specified.")
  set(CMAKE_BUILD_TYPE Release CACHE STRING "Choose the type of build, options are: Debug Release RelWithDebInfo MinSizeRel." FORCE)
endif()

# Compiler flags
set(CMAKE_C_FLAGS "-Wall -Wextra")
set(CMAKE_CXX_FLAGS "-Wall -Wextra")
set(CMAKE_C_FLAGS_DEBUG "-g")
set(CMAKE_C_FLAGS_RELEASE "-O3")
set(CMAKE_CXX_FLAGS_DEBUG "-g")
set(CMAKE_CXX_FLAGS_RELEASE "-O3")

# Add library subdirectories
"#,
        config.project_name,
        config.c_version(),
        config.cpp_version()
    );

    for lib in &config.libraries {
        let _ = writeln!(content, "add_subdirectory(lib/{})", lib.name);
    }

    content.push_str("\n# Add executables\n");
    for exe in &config.executables {
        content.push_str(&executable_block(exe));
    }

    if config.enable_tests {
        content.push_str(
            r#"

# --- Testing ---
enable_testing()
add_subdirectory(tests)
"#,
        );
    }

    content
}

fn executable_block(exe: &ExecutableConfig) -> String {
    let mut block = format!("add_executable({} {})\n", exe.name, exe.sources.join(" "));
    if !exe.dependencies.is_empty() {
        let _ = writeln!(
            block,
            "target_link_libraries({} PRIVATE {})",
            exe.name,
            exe.dependencies.join(" ")
        );
    }
    let _ = write!(
        block,
        r#"
set_target_properties({} PROPERTIES
    RUNTIME_OUTPUT_DIRECTORY ${{CMAKE_BINARY_DIR}}/bin
)
"#,
        exe.name
    );
    block
}

pub fn library_cmakelists(lib: &LibraryConfig) -> String {
    format!(
        r#"add_library({} {})

target_include_directories({} PUBLIC include)
"#,
        lib.name,
        lib.sources.join(" "),
        lib.name
    )
}

/// Placeholder `main` for every source of an executable.
pub fn executable_source(exe: &ExecutableConfig) -> String {
    format!(
        r#"#include <stdio.h>

int main(void) {{
    printf("Hello from {}\n");
    return 0;
}}
"#,
        exe.name
    )
}

/// Placeholder implementation of `<name>_hello` for every source of a library.
pub fn library_source(lib: &LibraryConfig) -> String {
    format!(
        r#"#include "{name}.h"
#include <stdio.h>

void {name}_hello() {{
    printf("Hello from {name}\n");
}}
"#,
        name = lib.name
    )
}

/// Header guard for every header of a library. Depends only on the library name.
pub fn header_guard(lib: &LibraryConfig) -> String {
    format!("{}_H", lib.name.to_uppercase())
}

pub fn library_header(lib: &LibraryConfig) -> String {
    format!(
        r#"#ifndef {guard}
#define {guard}

void {name}_hello(void);

#endif
"#,
        guard = header_guard(lib),
        name = lib.name
    )
}

/// File name of the GoogleTest source, e.g. `test_foo.cpp`.
pub fn test_source_name(lib: Option<&LibraryConfig>) -> String {
    match lib {
        Some(lib) => format!("test_{}.cpp", lib.name),
        None => "test_main.cpp".to_string(),
    }
}

pub fn tests_cmakelists(lib: Option<&LibraryConfig>) -> String {
    let link = match lib {
        Some(lib) => format!("GTest::gtest_main {}", lib.name),
        None => "GTest::gtest_main".to_string(),
    };
    format!(
        r#"# Add GTest

include(FetchContent)
FetchContent_Declare(
  googletest
  URL {url}
)
# For Windows: Prevent overriding the parent project's compiler/linker settings
set(gtest_force_shared_crt ON CACHE BOOL "" FORCE)
FetchContent_MakeAvailable(googletest)

# Create the test executable
add_executable({target} {source})

# Link against GTest and the library to be tested
target_link_libraries({target} PRIVATE {link})

# Discover and add tests to CTest
include(GoogleTest)
gtest_discover_tests({target})
"#,
        url = GOOGLETEST_URL,
        target = TEST_TARGET,
        source = test_source_name(lib),
        link = link
    )
}

pub fn test_source(lib: Option<&LibraryConfig>) -> String {
    match lib {
        Some(lib) => format!(
            r#"#include <gtest/gtest.h>
#include "{name}.h"

TEST({suite}, BasicTest) {{
    // A simple test to ensure the function can be called
    {name}_hello();
    SUCCEED();
}}

TEST({suite}, AlwaysPasses) {{
    EXPECT_TRUE(true);
}}
"#,
            name = lib.name,
            suite = test_suite_name(&lib.name)
        ),
        None => r#"#include <gtest/gtest.h>

TEST(ProjectTest, AlwaysPasses) {
    EXPECT_TRUE(true);
}
"#
        .to_string(),
    }
}

// foo -> FooTest, string_utils -> StringUtilsTest
fn test_suite_name(lib_name: &str) -> String {
    let mut suite: String = lib_name
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect();
    suite.push_str("Test");
    suite
}
