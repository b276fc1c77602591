use cmdtree::Command;
use std::cell::RefCell;
use std::rc::Rc;

/// Dispatch routing tests
#[cfg(test)]
mod dispatch_tests {
    use super::*;

    type Log = Rc<RefCell<Vec<(String, Vec<String>)>>>;

    fn recorder(name: &str, log: &Log) -> Command {
        let log = Rc::clone(log);
        Command::new(name, move |cmd: &Command, args: &[String]| {
            log.borrow_mut().push((cmd.name().to_string(), args.to_vec()));
            Ok(())
        })
    }

    fn argv(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_child_receives_shifted_args() {
        let log = Log::default();
        let app = recorder("app", &log);
        app.add_command(recorder("build", &log));

        app.execute(&argv(&["app", "build", "--flag"])).unwrap();

        assert_eq!(log.borrow()[0], ("build".to_string(), argv(&["build", "--flag"])));
    }

    #[test]
    fn test_root_without_children() {
        let log = Log::default();
        let app = recorder("app", &log);

        app.execute(&argv(&["app"])).unwrap();

        assert_eq!(log.borrow()[0], ("app".to_string(), argv(&["app"])));
    }

    #[test]
    fn test_two_levels_deep() {
        let log = Log::default();
        let app = recorder("app", &log);
        let sub1 = recorder("sub1", &log);
        sub1.add_command(recorder("sub2", &log));
        app.add_command(sub1);

        app.execute(&argv(&["app", "sub1", "sub2"])).unwrap();

        assert_eq!(log.borrow().len(), 1);
        assert_eq!(log.borrow()[0], ("sub2".to_string(), argv(&["sub2"])));
    }

    #[test]
    fn test_stops_at_first_unmatched_word() {
        let log = Log::default();
        let app = recorder("app", &log);
        let sub1 = recorder("sub1", &log);
        sub1.add_command(recorder("sub2", &log));
        app.add_command(sub1);

        app.execute(&argv(&["app", "sub1", "other", "sub2"])).unwrap();

        assert_eq!(
            log.borrow()[0],
            ("sub1".to_string(), argv(&["sub1", "other", "sub2"]))
        );
    }

    #[test]
    fn test_flag_before_subcommand_is_not_routed() {
        let log = Log::default();
        let app = recorder("app", &log);
        app.add_command(recorder("build", &log));

        app.execute(&argv(&["app", "--verbose", "build"])).unwrap();

        assert_eq!(
            log.borrow()[0],
            ("app".to_string(), argv(&["app", "--verbose", "build"]))
        );
    }

    #[test]
    fn test_args_zero_is_not_checked() {
        let log = Log::default();
        let app = recorder("app", &log);
        app.add_command(recorder("build", &log));

        app.execute(&argv(&["/usr/local/bin/app", "build"])).unwrap();

        assert_eq!(log.borrow()[0].0, "build");
    }

    #[test]
    fn test_same_name_replaces_child() {
        let log = Log::default();
        let app = recorder("app", &log);
        let first = recorder("x", &log);
        let second: Command = Command::new("x", |_, _| Err(anyhow::anyhow!("second")));

        app.add_command(first.clone());
        app.add_command(second.clone());

        assert_eq!(app.children().len(), 1);
        assert!(app.sub_command("x").unwrap().same_node(&second));
        let err = app.execute(&argv(&["app", "x"])).unwrap_err();
        assert_eq!(err.to_string(), "second");
        assert!(log.borrow().is_empty());

        // The replaced child still points at its former parent
        assert!(first.parent().unwrap().same_node(&app));
    }

    #[test]
    fn test_reattach_moves_parent_link() {
        let log = Log::default();
        let a = recorder("a", &log);
        let b = recorder("b", &log);
        let child = recorder("c", &log);

        a.add_command(child.clone());
        b.add_command(child.clone());

        assert!(child.parent().unwrap().same_node(&b));
        // Both maps still hold the child; only the back link moved
        assert!(a.sub_command("c").is_some());
        assert!(b.sub_command("c").is_some());
    }

    #[test]
    fn test_cycle_terminates_with_args() {
        let log = Log::default();
        let app = recorder("app", &log);
        let x = recorder("x", &log);
        app.add_command(x.clone());
        x.add_command(app.clone());

        app.execute(&argv(&["app", "x", "app", "x", "app"])).unwrap();

        assert_eq!(log.borrow()[0], ("app".to_string(), argv(&["app"])));
    }

    #[derive(Debug, PartialEq)]
    enum BuildError {
        MissingTarget,
    }

    #[test]
    fn test_error_returned_unchanged() {
        let app: Command<BuildError> = Command::new("app", |_, _| Ok(()));
        let tools: Command<BuildError> = Command::new("tools", |_, _| Ok(()));
        tools.add_command(Command::new("build", |_, _| Err(BuildError::MissingTarget)));
        app.add_command(tools);

        let result = app.execute_from(["app", "tools", "build"]);

        assert_eq!(result, Err(BuildError::MissingTarget));
    }

    #[test]
    fn test_handler_sees_its_own_command() {
        let app: Command = Command::new("app", |_, _| Ok(()));
        app.add_command(Command::new("whoami", |cmd, args| {
            assert_eq!(cmd.name(), "whoami");
            assert_eq!(cmd.path(), "app whoami");
            assert_eq!(args[0], "whoami");
            Ok(())
        }));

        app.execute_from(["app", "whoami"]).unwrap();
    }

    #[test]
    fn test_group_routes_to_children() {
        let log = Log::default();
        let app: Command = Command::group("app");
        app.add_command(recorder("run", &log));

        app.execute_from(["app", "run"]).unwrap();

        assert_eq!(log.borrow()[0].0, "run");
        assert!(!app.has_handler());
    }

    #[test]
    fn test_handler_parses_flags() {
        let seen = Rc::new(RefCell::new(None));
        let seen_in_handler = Rc::clone(&seen);
        let build: Command = Command::new("build", move |cmd: &Command, args: &[String]| {
            let matches = cmd.parse_flags(args)?;
            *seen_in_handler.borrow_mut() = matches.get_one::<String>("target").cloned();
            Ok(())
        })
        .with_flags(|f| f.arg(clap::Arg::new("target").long("target")));
        let app: Command = Command::new("app", |_, _| Ok(())).subcommand(build);

        app.execute_from(["app", "build", "--target", "arm"]).unwrap();
        assert_eq!(seen.borrow().as_deref(), Some("arm"));

        let err = app.execute_from(["app", "build", "--oops"]).unwrap_err();
        assert!(err.downcast_ref::<clap::Error>().is_some());
    }
}
