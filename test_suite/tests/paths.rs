#[derive(Debug, Default, Clone, PartialEq)]
pub struct Model {
    pub id: u32,
}

#[pinky::ghost]
mod samples {
    pub mod model {
        #[derive(Debug, Default, Clone, PartialEq)]
        pub struct User {
            pub name: String,
        }
    }

    pub trait IRepository {
        fn load(&self, user: self::model::User) -> super::Model;
        fn save(&self, model: super::Model) -> bool;
    }

    pub mod contracts {
        pub trait IDirectory {
            fn find(&self, model: super::super::Model) -> Option<super::model::User>;
        }
    }

    #[test]
    fn test1() {
        let instance = Ghost::of::<dyn IRepository>();
        instance.save(super::Model::default()).returns(true);

        assert_eq!(instance.load(model::User::default()), super::Model::default());
        assert!(instance.save(super::Model { id: 3 }));
        Ghost::received(&instance, 1).save(super::Model::default());
    }

    #[test]
    fn test2() {
        let instance = Ghost::of::<dyn IRepository>();
        instance.configure("load", super::Model { id: 7 });

        assert_eq!(instance.load(model::User::default()).id, 7);
    }

    #[test]
    fn test3() {
        let instance = Ghost::of::<dyn contracts::IDirectory>();
        instance.configure(
            "find",
            Some(model::User {
                name: "ghost".to_owned(),
            }),
        );

        let found = instance.find(super::Model::default());
        assert_eq!(found.map(|user| user.name), Some("ghost".to_owned()));
    }
}
