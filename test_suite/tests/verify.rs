#[pinky::ghost]
mod samples {
    pub trait IWithVoidMethod {
        fn void_method(&self);
        fn other_method(&self);
    }

    pub trait IWithMutMethod {
        fn push(&mut self, value: i32);
        fn len(&self) -> usize;
    }

    pub unsafe trait IUnsafe {
        fn touch(&self) -> u8;
    }

    #[test]
    fn track_method_call() {
        let instance = Ghost::of::<dyn IWithVoidMethod>();
        instance.void_method();

        Ghost::received(&instance, 1).void_method();
    }

    #[test]
    fn track_several_calls() {
        let instance = Ghost::of::<dyn IWithVoidMethod>();
        instance.void_method();
        instance.void_method();
        instance.other_method();

        Ghost::received(&instance, 2).void_method();
        Ghost::received(&instance, 1).other_method();
        assert_eq!(instance.calls("void_method"), 2);
    }

    #[test]
    fn verification_does_not_record() {
        let instance = Ghost::of::<dyn IWithVoidMethod>();
        instance.void_method();

        Ghost::received(&instance, 1).void_method();
        Ghost::received(&instance, 1).void_method();
        assert_eq!(instance.core().ledger().total(), 1);
    }

    #[test]
    fn did_not_receive() {
        let instance = Ghost::of::<dyn IWithVoidMethod>();
        instance.other_method();

        Ghost::did_not_receive(&instance).void_method();
    }

    #[test]
    #[should_panic(
        expected = "Expected to receive exactly 1 call(s) matching:\n\tvoid_method()\nActually received 0 matching call(s):\n\tvoid_method()"
    )]
    fn missing_call_panics() {
        let instance = Ghost::of::<dyn IWithVoidMethod>();

        Ghost::received(&instance, 1).void_method();
    }

    #[test]
    #[should_panic(
        expected = "Expected to receive exactly 0 call(s) matching:\n\tvoid_method()\nActually received 2 matching call(s):\n\tvoid_method()"
    )]
    fn unexpected_call_panics() {
        let instance = Ghost::of::<dyn IWithVoidMethod>();
        instance.void_method();
        instance.void_method();

        Ghost::did_not_receive(&instance).void_method();
    }

    #[test]
    fn mut_receiver() {
        let mut instance = Ghost::of::<dyn IWithMutMethod>();
        instance.push(1);
        instance.push(2);
        instance.len().returns(2);

        assert_eq!(instance.len(), 2);
        Ghost::received(&instance, 2).push(0);
        Ghost::received(&instance, 1).len();
    }

    #[test]
    fn unsafe_contract() {
        let instance = Ghost::of::<dyn IUnsafe>();
        instance.touch().returns(7);

        assert_eq!(instance.touch(), 7);
        Ghost::received(&instance, 1).touch();
    }

    #[test]
    fn into_inner_keeps_recording() {
        let instance = Ghost::of::<dyn IWithVoidMethod>();
        let core = std::rc::Rc::clone(instance.core());

        let boxed: Box<dyn IWithVoidMethod> = instance.into_inner();
        boxed.void_method();

        assert_eq!(core.ledger().count("void_method", &[]), 1);
    }
}
