// src/builtins.rs

//! Commands that run inside the shell process.
//!
//! Their effect (working directory, environment, leaving the loop) has to
//! outlive the command, so they are never handed to a child.

use std::path::Path;

use tracing::debug;

use crate::env::EnvStore;
use crate::errors::{Result, ShellError};

/// A builtin invocation, classified once per line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Builtin {
    /// `cd [dir]`
    Cd(Option<String>),
    /// `export NAME=VALUE`
    Export(Vec<String>),
    /// `unset NAME...`
    Unset(Vec<String>),
    /// `exit [code]`
    Exit(Option<String>),
}

/// What the loop should do after a builtin returns successfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinFlow {
    Continue,
    /// Leave the loop; `None` means "use the last command status".
    Exit(Option<i32>),
}

impl Builtin {
    /// Recognise a builtin from a command's argv. Returns `None` for
    /// anything that must be executed as a program.
    pub fn from_argv(argv: &[String]) -> Option<Builtin> {
        let (name, args) = argv.split_first()?;
        let builtin = match name.as_str() {
            "cd" => Builtin::Cd(args.first().cloned()),
            "export" => Builtin::Export(args.to_vec()),
            "unset" => Builtin::Unset(args.to_vec()),
            "exit" => Builtin::Exit(args.first().cloned()),
            _ => return None,
        };
        Some(builtin)
    }

    pub fn is_builtin_name(name: &str) -> bool {
        matches!(name, "cd" | "export" | "unset" | "exit")
    }

    pub fn name(&self) -> &'static str {
        match self {
            Builtin::Cd(_) => "cd",
            Builtin::Export(_) => "export",
            Builtin::Unset(_) => "unset",
            Builtin::Exit(_) => "exit",
        }
    }

    /// Run the builtin against the shell's own state.
    pub fn run(&self, env: &mut dyn EnvStore) -> Result<BuiltinFlow> {
        debug!(builtin = self.name(), "running builtin");
        match self {
            Builtin::Cd(dir) => change_dir(dir.as_deref(), env)?,
            Builtin::Export(args) => export(args, env)?,
            Builtin::Unset(names) => unset(names, env)?,
            Builtin::Exit(code) => return exit_code(code.as_deref()).map(BuiltinFlow::Exit),
        }
        Ok(BuiltinFlow::Continue)
    }
}

fn change_dir(dir: Option<&str>, env: &mut dyn EnvStore) -> Result<()> {
    let target = match dir {
        Some(dir) => dir.to_string(),
        None => env
            .get("HOME")
            .ok_or_else(|| ShellError::builtin("cd: HOME not set"))?,
    };

    std::env::set_current_dir(Path::new(&target)).map_err(|e| {
        debug!(path = %target, error = %e, "chdir rejected");
        ShellError::builtin(format!("cd: no such directory: {target}"))
    })?;

    if let Ok(cwd) = std::env::current_dir() {
        env.set("PWD", &cwd.to_string_lossy());
    }
    Ok(())
}

fn export(args: &[String], env: &mut dyn EnvStore) -> Result<()> {
    let assignment = args
        .first()
        .ok_or_else(|| ShellError::builtin("export: malformed assignment"))?;

    match assignment.split_once('=') {
        Some((name, value)) if !name.is_empty() => {
            env.set(name, value);
            Ok(())
        }
        _ => Err(ShellError::builtin("export: malformed assignment")),
    }
}

fn unset(names: &[String], env: &mut dyn EnvStore) -> Result<()> {
    if names.is_empty() {
        return Err(ShellError::builtin("unset: missing argument"));
    }
    for name in names {
        env.remove(name);
    }
    Ok(())
}

fn exit_code(arg: Option<&str>) -> Result<Option<i32>> {
    arg.map(|s| {
        s.parse::<i32>()
            .map_err(|_| ShellError::builtin(format!("exit: {s}: numeric argument required")))
    })
    .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::MemoryEnv;

    fn argv(s: &str) -> Vec<String> {
        s.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn recognises_builtins_only() {
        assert_eq!(
            Builtin::from_argv(&argv("cd /tmp")),
            Some(Builtin::Cd(Some("/tmp".into())))
        );
        assert_eq!(Builtin::from_argv(&argv("cd")), Some(Builtin::Cd(None)));
        assert_eq!(Builtin::from_argv(&argv("exit")), Some(Builtin::Exit(None)));
        assert_eq!(Builtin::from_argv(&argv("echo cd")), None);
        assert_eq!(Builtin::from_argv(&[]), None);
    }

    #[test]
    fn export_sets_and_overwrites() {
        let mut env = MemoryEnv::new();
        Builtin::Export(argv("FOO=bar")).run(&mut env).unwrap();
        assert_eq!(env.get("FOO").as_deref(), Some("bar"));

        Builtin::Export(argv("FOO=a=b")).run(&mut env).unwrap();
        assert_eq!(env.get("FOO").as_deref(), Some("a=b"));

        Builtin::Export(argv("EMPTY=")).run(&mut env).unwrap();
        assert_eq!(env.get("EMPTY").as_deref(), Some(""));
    }

    #[test]
    fn malformed_export_leaves_env_unchanged() {
        let mut env = MemoryEnv::new().with_var("FOO", "old");
        for bad in ["export FOO", "export", "export =x"] {
            let builtin = Builtin::from_argv(&argv(bad)).unwrap();
            let err = builtin.run(&mut env).unwrap_err();
            assert!(
                matches!(err, ShellError::Builtin(ref m) if m.contains("malformed assignment")),
                "unexpected error for {bad:?}: {err:?}"
            );
        }
        assert_eq!(env.get("FOO").as_deref(), Some("old"));
        assert_eq!(env.len(), 1);
    }

    #[test]
    fn unset_requires_a_name_but_tolerates_absent_ones() {
        let mut env = MemoryEnv::new().with_var("A", "1");
        let err = Builtin::Unset(vec![]).run(&mut env).unwrap_err();
        assert!(matches!(err, ShellError::Builtin(ref m) if m.contains("missing argument")));

        Builtin::Unset(argv("A NOT_THERE")).run(&mut env).unwrap();
        assert!(env.is_empty());
    }

    #[test]
    fn cd_into_missing_directory_fails() {
        let mut env = MemoryEnv::new();
        let before = std::env::current_dir().unwrap();
        let err = Builtin::Cd(Some("/definitely/not/a/dir".into()))
            .run(&mut env)
            .unwrap_err();
        assert!(matches!(err, ShellError::Builtin(ref m) if m.contains("no such directory")));
        assert_eq!(std::env::current_dir().unwrap(), before);
        assert_eq!(env.get("PWD"), None);
    }

    #[test]
    fn cd_without_home_fails() {
        let mut env = MemoryEnv::new();
        let err = Builtin::Cd(None).run(&mut env).unwrap_err();
        assert!(matches!(err, ShellError::Builtin(ref m) if m.contains("HOME not set")));
    }

    #[test]
    fn exit_parses_optional_code() {
        let mut env = MemoryEnv::new();
        assert_eq!(
            Builtin::Exit(None).run(&mut env).unwrap(),
            BuiltinFlow::Exit(None)
        );
        assert_eq!(
            Builtin::Exit(Some("3".into())).run(&mut env).unwrap(),
            BuiltinFlow::Exit(Some(3))
        );
        assert!(Builtin::Exit(Some("x".into())).run(&mut env).is_err());
    }
}
