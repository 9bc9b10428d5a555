//! App bundle assembler.
//!
//! Builds `<Name>.app` around a portable interpreter tree and the files in
//! the help-resources directory, then optionally zips it.

use super::layout::{APP_ICON, BundleLayout, INFO_PLIST, LAUNCHER_TEMPLATE, SMOKE_SCRIPT};
use crate::bundler::{
    archive::{self, ArchiveMode},
    builder::{ArtifactKind, BundledArtifact},
    error::{Error, ErrorExt, Result},
    settings::BundleSettings,
    utils::{
        fs,
        template::{self, Escape},
    },
};

/// Assembles the bundle and, unless disabled, compresses it.
///
/// # Process
///
/// 1. Refuse to run if `<Name>.app` already exists or a help file is missing
/// 2. Create `Contents/{Frameworks,MacOS,Resources}`
/// 3. Render `Info.plist`, copy the icon
/// 4. Copy the interpreter tree and the smoke-test script into `Resources`
/// 5. Render `run.sh` as `MacOS/<Name>` and mark it executable
/// 6. Zip the bundle as `<name>-portable.zip`
///
/// # Returns
///
/// The bundle directory artifact, followed by the archive if one was made.
pub async fn bundle_project(settings: &BundleSettings) -> Result<Vec<BundledArtifact>> {
    log::info!("Creating the App Bundle for \"{}\"", settings.bundle_name());
    let layout = create_app_bundle(settings).await?;

    let mut artifacts = vec![BundledArtifact::describe(ArtifactKind::AppBundle, layout.root()).await?];

    if settings.compress() {
        log::info!("Compressing the \"{}\" App Bundle", settings.bundle_name());
        let zip_path = archive::compress_folder(
            layout.root(),
            &settings.archive_path(),
            ArchiveMode::ZipAsFolder,
        )
        .await?;
        artifacts.push(BundledArtifact::describe(ArtifactKind::Archive, &zip_path).await?);
    }

    Ok(artifacts)
}

/// Creates `<output_dir>/<Name>.app` and fills it.
///
/// If any step after the bundle directory exists fails, the partial bundle
/// is removed so the next run starts clean.
pub async fn create_app_bundle(settings: &BundleSettings) -> Result<BundleLayout> {
    let layout = BundleLayout::new(settings.output_dir(), settings.bundle_name());
    if layout.root().symlink_metadata().is_ok() {
        return Err(Error::AlreadyExists {
            kind: "app bundle",
            path: layout.root().to_path_buf(),
        });
    }
    if !settings.python_dir().is_dir() {
        return Err(Error::NotFound {
            kind: "python directory",
            path: settings.python_dir().to_path_buf(),
        });
    }
    check_help_files(settings)?;

    log::info!("Creating the App Bundle folders required...");
    fs::create_new_dir(layout.root()).await?;

    if let Err(e) = fill_app_bundle(settings, &layout).await {
        log::warn!("Removing incomplete bundle {}", layout.root().display());
        if let Err(cleanup) = fs::remove_dir_if_exists(layout.root()).await {
            log::warn!("Could not remove {}: {}", layout.root().display(), cleanup);
        }
        return Err(e);
    }

    log::info!("✓ Created {}", layout.root().display());
    Ok(layout)
}

async fn fill_app_bundle(settings: &BundleSettings, layout: &BundleLayout) -> Result<()> {
    let help = settings.resources_dir();
    let context = settings.template_context();

    for dir in layout.skeleton().into_iter().skip(1) {
        fs::create_new_dir(&dir).await?;
    }

    log::info!("Adding {}...", INFO_PLIST);
    template::render_file(&help.join(INFO_PLIST), &layout.info_plist(), &context, Escape::Xml).await?;

    log::info!("Adding app icon...");
    fs::copy_file(&help.join(APP_ICON), &layout.icon()).await?;

    log::info!("Copying the Python folder...");
    let python_dest = layout.python_dir(&context.python_dir_name);
    fs::copy_dir(settings.python_dir(), &python_dest).await?;

    log::info!("Adding the GUI smoke-test script...");
    fs::copy_file(&help.join(SMOKE_SCRIPT), &layout.smoke_script()).await?;

    log::info!("Adding internal executable...");
    let launcher = layout.launcher(context.executable_name);
    template::render_file(&help.join(LAUNCHER_TEMPLATE), &launcher, &context, Escape::Shell).await?;
    fs::make_executable(&launcher).await?;

    Ok(())
}

/// All help files must exist and be readable before anything is written.
fn check_help_files(settings: &BundleSettings) -> Result<()> {
    let help = settings.resources_dir();
    if !help.is_dir() {
        return Err(Error::NotFound {
            kind: "resources directory",
            path: help.to_path_buf(),
        });
    }
    for name in [INFO_PLIST, APP_ICON, SMOKE_SCRIPT, LAUNCHER_TEMPLATE] {
        let path = help.join(name);
        if !path.is_file() {
            return Err(Error::NotFound {
                kind: "resource file",
                path,
            });
        }
        std::fs::File::open(&path).fs_context("open resource file", &path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::settings::BundleSettingsBuilder;
    use std::path::Path;

    fn help_dir(root: &Path) -> std::path::PathBuf {
        let help = root.join("app_bundle");
        std::fs::create_dir_all(&help).unwrap();
        std::fs::write(
            help.join(INFO_PLIST),
            "<string>{{executable_name}}</string><string>{{bundle_identifier}}</string>",
        )
        .unwrap();
        std::fs::write(help.join(APP_ICON), b"icns\0\0\0\x08").unwrap();
        std::fs::write(help.join(SMOKE_SCRIPT), "print('hello')\n").unwrap();
        std::fs::write(
            help.join(LAUNCHER_TEMPLATE),
            "#!/bin/sh\nexec \"$(dirname \"$0\")/../Resources/{{python_dir_name}}/bin/{{python_version}}\"\n",
        )
        .unwrap();
        help
    }

    fn python_dir(root: &Path) -> std::path::PathBuf {
        let python = root.join("python");
        std::fs::create_dir_all(python.join("bin")).unwrap();
        std::fs::create_dir_all(python.join("lib/python3.6")).unwrap();
        std::fs::write(python.join("bin/python3.6"), "").unwrap();
        std::fs::write(python.join("lib/python3.6/os.pyc"), "").unwrap();
        python
    }

    fn settings(root: &Path, compress: bool) -> BundleSettings {
        let out = root.join("out");
        std::fs::create_dir_all(&out).unwrap();
        BundleSettingsBuilder::new()
            .bundle_name("Demo")
            .python_dir(python_dir(root))
            .resources_dir(help_dir(root))
            .output_dir(out)
            .identifier("com.example.demo")
            .compress(compress)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn assembles_bundle_layout() {
        let tmp = tempfile::tempdir().unwrap();
        let settings = settings(tmp.path(), false);

        let artifacts = bundle_project(&settings).await.unwrap();

        assert_eq!(artifacts.len(), 1);
        let app = tmp.path().join("out/Demo.app");
        assert_eq!(artifacts[0].path, app);
        for dir in ["Contents/Frameworks", "Contents/MacOS", "Contents/Resources"] {
            assert!(app.join(dir).is_dir(), "{dir} missing");
        }
        assert_eq!(
            std::fs::read_to_string(app.join("Contents/Info.plist")).unwrap(),
            "<string>Demo</string><string>com.example.demo</string>"
        );
        assert!(app.join("Contents/Resources/appIcon.icns").is_file());
        assert!(app.join("Contents/Resources/pyqt_test.py").is_file());
        assert!(app.join("Contents/Resources/python/lib/python3.6/os.pyc").is_file());

        let launcher = std::fs::read_to_string(app.join("Contents/MacOS/Demo")).unwrap();
        assert!(launcher.contains("Resources/python/bin/python3.6"));
        assert!(!tmp.path().join("out/demo-portable.zip").exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn launcher_is_executable() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        let settings = settings(tmp.path(), false);
        bundle_project(&settings).await.unwrap();

        let mode = std::fs::metadata(tmp.path().join("out/Demo.app/Contents/MacOS/Demo"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o111, (mode & 0o444) >> 2);
        assert_ne!(mode & 0o100, 0);
    }

    #[tokio::test]
    async fn existing_bundle_is_left_alone() {
        let tmp = tempfile::tempdir().unwrap();
        let settings = settings(tmp.path(), false);
        let app = tmp.path().join("out/Demo.app");
        std::fs::create_dir_all(&app).unwrap();
        std::fs::write(app.join("marker"), "keep").unwrap();

        let err = bundle_project(&settings).await.unwrap_err();

        assert!(matches!(err, Error::AlreadyExists { kind: "app bundle", .. }));
        assert_eq!(std::fs::read_to_string(app.join("marker")).unwrap(), "keep");
        assert!(!app.join("Contents").exists());
    }

    #[tokio::test]
    async fn missing_help_file_stops_before_writing() {
        let tmp = tempfile::tempdir().unwrap();
        let settings = settings(tmp.path(), false);
        std::fs::remove_file(tmp.path().join("app_bundle").join(APP_ICON)).unwrap();

        let err = bundle_project(&settings).await.unwrap_err();

        assert!(matches!(err, Error::NotFound { kind: "resource file", .. }));
        assert!(!tmp.path().join("out/Demo.app").exists());
    }

    #[tokio::test]
    async fn compresses_into_lowercase_archive() {
        let tmp = tempfile::tempdir().unwrap();
        let settings = settings(tmp.path(), true);

        let artifacts = bundle_project(&settings).await.unwrap();

        assert_eq!(artifacts.len(), 2);
        assert_eq!(artifacts[1].kind, ArtifactKind::Archive);
        let zip_path = tmp.path().join("out/demo-portable.zip");
        assert!(zip_path.is_file());

        let archive = zip::ZipArchive::new(std::fs::File::open(&zip_path).unwrap()).unwrap();
        assert!(archive.file_names().any(|n| n == "Demo.app/Contents/Info.plist"));
    }

    #[tokio::test]
    async fn binary_plist_is_copied_verbatim() {
        let tmp = tempfile::tempdir().unwrap();
        let settings = settings(tmp.path(), false);
        let plist = b"bplist00\xd1\x01\x02\xff\xfe".to_vec();
        std::fs::write(tmp.path().join("app_bundle").join(INFO_PLIST), &plist).unwrap();

        bundle_project(&settings).await.unwrap();

        let copied = std::fs::read(tmp.path().join("out/Demo.app/Contents/Info.plist")).unwrap();
        assert_eq!(copied, plist);
    }

    #[tokio::test]
    async fn plist_values_are_xml_escaped() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("out");
        std::fs::create_dir_all(&out).unwrap();
        let settings = BundleSettingsBuilder::new()
            .bundle_name("Tom & <Jerry>")
            .python_dir(python_dir(tmp.path()))
            .resources_dir(help_dir(tmp.path()))
            .output_dir(&out)
            .compress(false)
            .build()
            .unwrap();

        bundle_project(&settings).await.unwrap();

        let app = out.join("Tom & <Jerry>.app");
        let plist = std::fs::read_to_string(app.join("Contents/Info.plist")).unwrap();
        assert!(plist.starts_with("<string>Tom &amp; &lt;Jerry&gt;</string>"));
        assert!(app.join("Contents/MacOS/Tom & <Jerry>").is_file());
    }

    #[tokio::test]
    async fn failed_assembly_leaves_no_partial_bundle() {
        let tmp = tempfile::tempdir().unwrap();
        let settings = settings(tmp.path(), false);
        std::fs::write(
            tmp.path().join("app_bundle").join(LAUNCHER_TEMPLATE),
            "#!/bin/sh\nexec {{no_such_variable}}\n",
        )
        .unwrap();

        let err = bundle_project(&settings).await.unwrap_err();
        assert!(matches!(err, Error::Template(_)));
        assert!(!tmp.path().join("out/Demo.app").exists());

        std::fs::write(
            tmp.path().join("app_bundle").join(LAUNCHER_TEMPLATE),
            "#!/bin/sh\n",
        )
        .unwrap();
        bundle_project(&settings).await.unwrap();
        assert!(tmp.path().join("out/Demo.app/Contents/MacOS/Demo").is_file());
    }
}
